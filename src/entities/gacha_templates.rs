use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::gacha::{TemplateDefinition, TierCounts};

/// 用户自定义模板
/// 说明:
/// - 只保存各等级数量，奖池在读取时由 builder 生成
/// - is_public = false 时仅创建者可见
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "gacha_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: i64,
    pub name: String,
    pub theme: String,
    pub item_noun: String,
    pub tier1_count: i32,
    pub tier2_count: i32,
    pub tier3_count: i32,
    pub tier4_count: i32,
    pub tier5_count: i32,
    pub is_public: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn counts(&self) -> TierCounts {
        // 写入前已校验非负
        let n = |v: i32| v.max(0) as u32;
        TierCounts::new(
            n(self.tier1_count),
            n(self.tier2_count),
            n(self.tier3_count),
            n(self.tier4_count),
            n(self.tier5_count),
        )
    }
}

impl From<Model> for TemplateDefinition {
    fn from(m: Model) -> Self {
        let counts = m.counts();
        TemplateDefinition {
            id: m.id.to_string(),
            name: m.name,
            theme: m.theme,
            counts,
            item_noun: m.item_noun,
            is_system: false,
            is_public: m.is_public,
            owner_id: Some(m.user_id),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
