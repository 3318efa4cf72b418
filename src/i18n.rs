//! 等级显示名称。语言作为参数注入，不使用全局状态。

use crate::gacha::Tier;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ko,
    #[default]
    En,
}

impl Language {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ko" | "ko-kr" => Some(Language::Ko),
            "en" | "en-us" | "en-gb" => Some(Language::En),
            _ => None,
        }
    }

    pub fn tier_name(&self, tier: Tier) -> &'static str {
        match (self, tier) {
            (Language::Ko, Tier::Legendary) => "전설",
            (Language::Ko, Tier::Epic) => "영웅",
            (Language::Ko, Tier::Rare) => "희귀",
            (Language::Ko, Tier::Uncommon) => "고급",
            (Language::Ko, Tier::Common) => "일반",
            (Language::En, Tier::Legendary) => "Legendary",
            (Language::En, Tier::Epic) => "Epic",
            (Language::En, Tier::Rare) => "Rare",
            (Language::En, Tier::Uncommon) => "Uncommon",
            (Language::En, Tier::Common) => "Common",
        }
    }

    /// 抽完后的提示
    pub fn completed_message(&self) -> &'static str {
        match self {
            Language::Ko => "모든 아이템을 뽑았습니다!",
            Language::En => "All items have been drawn!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Language::parse("ko"), Some(Language::Ko));
        assert_eq!(Language::parse(" EN "), Some(Language::En));
        assert_eq!(Language::parse("fr"), None);
    }

    #[test]
    fn test_tier_names() {
        assert_eq!(Language::Ko.tier_name(Tier::Legendary), "전설");
        assert_eq!(Language::En.tier_name(Tier::Uncommon), "Uncommon");
        assert_eq!(Language::default(), Language::En);
    }
}
