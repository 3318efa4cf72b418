use super::builder::{DEFAULT_ITEM_NOUN, TierCounts, build_pool_with_noun};
use super::item::PrizePool;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 模板定义：生成奖池所需的全部信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemplateDefinition {
    pub id: String,
    pub name: String,
    pub theme: String,
    pub counts: TierCounts,
    pub item_noun: String,
    pub is_system: bool,
    pub is_public: bool,
    pub owner_id: Option<i64>,
}

impl TemplateDefinition {
    fn system(id: &str, name: &str, theme: &str, counts: TierCounts, noun: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            theme: theme.to_string(),
            counts,
            item_noun: noun.to_string(),
            is_system: true,
            is_public: true,
            owner_id: None,
        }
    }

    pub fn build_pool(&self) -> PrizePool {
        PrizePool::new(
            self.id.clone(),
            self.name.clone(),
            self.theme.clone(),
            build_pool_with_noun(&self.counts, &self.item_noun),
        )
    }

    /// 自定义模板只对拥有者可见，除非公开
    pub fn visible_to(&self, user_id: Option<i64>) -> bool {
        self.is_system || self.is_public || (user_id.is_some() && self.owner_id == user_id)
    }
}

pub const DEFAULT_TEMPLATE_ID: &str = "default";

pub fn system_templates() -> Vec<TemplateDefinition> {
    vec![
        TemplateDefinition::system(
            DEFAULT_TEMPLATE_ID,
            "Classic Gacha",
            "classic",
            TierCounts::new(1, 3, 12, 40, 100),
            DEFAULT_ITEM_NOUN,
        ),
        TemplateDefinition::system(
            "premium",
            "Premium Gacha",
            "golden",
            TierCounts::new(2, 4, 15, 50, 120),
            "Premium",
        ),
        TemplateDefinition::system(
            "fantasy",
            "Fantasy Gacha",
            "magical",
            TierCounts::new(1, 3, 10, 35, 80),
            "Magic Item",
        ),
        TemplateDefinition::system(
            "cyber",
            "Cyber Gacha",
            "neon",
            TierCounts::new(1, 2, 8, 25, 60),
            "Cyber Chip",
        ),
        TemplateDefinition::system(
            "retro",
            "Retro Gacha",
            "vintage",
            TierCounts::new(2, 5, 18, 60, 140),
            "Vintage",
        ),
        TemplateDefinition::system(
            "space",
            "Space Gacha",
            "cosmic",
            TierCounts::new(1, 4, 14, 45, 110),
            "Cosmic Stone",
        ),
    ]
}

pub fn find_system_template(id: &str) -> Option<TemplateDefinition> {
    system_templates().into_iter().find(|t| t.id == id)
}
