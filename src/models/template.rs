use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::gacha::{TemplateDefinition, TierCounts};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TemplateResponse {
    pub id: String,
    pub name: String,
    pub theme: String,
    pub counts: TierCounts,
    pub total_items: u64,
    pub is_system: bool,
    pub is_public: bool,
}

impl From<TemplateDefinition> for TemplateResponse {
    fn from(t: TemplateDefinition) -> Self {
        Self {
            total_items: t.counts.total(),
            id: t.id,
            name: t.name,
            theme: t.theme,
            counts: t.counts,
            is_system: t.is_system,
            is_public: t.is_public,
        }
    }
}

/// 创建自定义模板
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateTemplateRequest {
    #[schema(example = "Office Party")]
    pub name: String,
    #[schema(example = "classic")]
    pub theme: Option<String>,
    /// 条目名称中使用的名词，缺省为 "Item"
    pub item_noun: Option<String>,
    pub counts: TierCounts,
    #[serde(default)]
    pub is_public: bool,
}
