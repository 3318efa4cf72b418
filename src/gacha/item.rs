use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 奖品等级。1 最稀有，5 最常见。
/// 序列化为整数等级 (1..=5)，其它值在反序列化时拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    Legendary,
    Epic,
    Rare,
    Uncommon,
    Common,
}

impl Tier {
    /// 按稀有度从高到低
    pub const ALL: [Tier; 5] = [
        Tier::Legendary,
        Tier::Epic,
        Tier::Rare,
        Tier::Uncommon,
        Tier::Common,
    ];

    pub fn rank(&self) -> u8 {
        match self {
            Tier::Legendary => 1,
            Tier::Epic => 2,
            Tier::Rare => 3,
            Tier::Uncommon => 4,
            Tier::Common => 5,
        }
    }

    /// id 前缀，同时也是前端配色使用的 key
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Legendary => "legendary",
            Tier::Epic => "epic",
            Tier::Rare => "rare",
            Tier::Uncommon => "uncommon",
            Tier::Common => "common",
        }
    }

    /// 名义概率（百分比），不是采样权重
    pub fn base_weight(&self) -> f64 {
        match self {
            Tier::Legendary => 0.5,
            Tier::Epic => 2.5,
            Tier::Rare => 10.0,
            Tier::Uncommon => 25.0,
            Tier::Common => 62.0,
        }
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tier::Legendary),
            2 => Ok(Tier::Epic),
            3 => Ok(Tier::Rare),
            4 => Ok(Tier::Uncommon),
            5 => Ok(Tier::Common),
            other => Err(format!("invalid tier {other}, expected 1..=5")),
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.rank()
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PrizeItem {
    pub id: String,
    pub name: String,
    #[schema(value_type = u8)]
    pub tier: Tier,
    /// 名义概率（百分比）
    #[serde(alias = "probability")]
    pub weight: f64,
    #[serde(default)]
    pub drawn: bool,
}

impl PrizeItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, tier: Tier, weight: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier,
            weight,
            drawn: false,
        }
    }
}

/// 一个模板实例对应的奖池。条目集合在构造后固定，引擎只翻转 drawn。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PrizePool {
    pub id: String,
    pub name: String,
    pub theme: String,
    pub items: Vec<PrizeItem>,
}

impl PrizePool {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        theme: impl Into<String>,
        items: Vec<PrizeItem>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            theme: theme.into(),
            items,
        }
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    pub fn drawn_count(&self) -> usize {
        self.items.iter().filter(|i| i.drawn).count()
    }

    pub fn remaining_count(&self) -> usize {
        self.items.iter().filter(|i| !i.drawn).count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.items.iter().all(|i| i.drawn)
    }
}
