use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::gacha_result_entity;

/// 历史记录查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HistoryQuery {
    /// 页码 (默认 1)
    pub page: Option<u32>,
    /// 每页数量 (默认 20，上限见配置 history_limit)
    pub per_page: Option<u32>,
    /// 只看某个模板
    pub template_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GachaResultResponse {
    pub id: i64,
    pub template_id: String,
    pub template_name: String,
    pub item_id: String,
    pub item_name: String,
    pub tier: i16,
    pub drawn_at: DateTime<Utc>,
}

impl From<gacha_result_entity::Model> for GachaResultResponse {
    fn from(m: gacha_result_entity::Model) -> Self {
        Self {
            id: m.id,
            template_id: m.template_id,
            template_name: m.template_name,
            item_id: m.item_id,
            item_name: m.item_name,
            tier: m.tier,
            drawn_at: m.drawn_at.unwrap_or_else(Utc::now),
        }
    }
}
