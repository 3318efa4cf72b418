//! 按等级数量生成奖品条目

use super::item::{PrizeItem, Tier};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_ITEM_NOUN: &str = "Item";

/// 每个等级的数量，缺省为 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TierCounts {
    #[serde(default)]
    pub tier1: u32,
    #[serde(default)]
    pub tier2: u32,
    #[serde(default)]
    pub tier3: u32,
    #[serde(default)]
    pub tier4: u32,
    #[serde(default)]
    pub tier5: u32,
}

impl TierCounts {
    pub fn new(tier1: u32, tier2: u32, tier3: u32, tier4: u32, tier5: u32) -> Self {
        Self {
            tier1,
            tier2,
            tier3,
            tier4,
            tier5,
        }
    }

    pub fn get(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Legendary => self.tier1,
            Tier::Epic => self.tier2,
            Tier::Rare => self.tier3,
            Tier::Uncommon => self.tier4,
            Tier::Common => self.tier5,
        }
    }

    pub fn total(&self) -> u64 {
        Tier::ALL.iter().map(|t| self.get(*t) as u64).sum()
    }
}

fn display_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Legendary => "Legendary",
        Tier::Epic => "Epic",
        Tier::Rare => "Rare",
        Tier::Uncommon => "Uncommon",
        Tier::Common => "Common",
    }
}

pub fn build_pool(counts: &TierCounts) -> Vec<PrizeItem> {
    build_pool_with_noun(counts, DEFAULT_ITEM_NOUN)
}

/// 生成顺序：等级 1 到 5，每个等级内 id 从 1 开始递增
pub fn build_pool_with_noun(counts: &TierCounts, noun: &str) -> Vec<PrizeItem> {
    let mut items = Vec::with_capacity(counts.total() as usize);
    for tier in Tier::ALL {
        for n in 1..=counts.get(tier) {
            items.push(PrizeItem::new(
                format!("{}-{}", tier.as_str(), n),
                format!("{} {} #{}", display_label(tier), noun, n),
                tier,
                tier.base_weight(),
            ));
        }
    }
    items
}
