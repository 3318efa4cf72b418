use crate::entities::gacha_template_entity as templates;
use crate::error::{AppError, AppResult};
use crate::gacha::builder::DEFAULT_ITEM_NOUN;
use crate::gacha::{TemplateDefinition, Tier, find_system_template, system_templates};
use crate::models::CreateTemplateRequest;
use crate::utils::validate_template_name;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

/// 单个等级的数量上限
pub const MAX_TIER_COUNT: u32 = 1_000;
/// 单个模板的条目总数上限
pub const MAX_TEMPLATE_ITEMS: u64 = 5_000;

const DEFAULT_THEME: &str = "classic";

#[derive(Clone)]
pub struct TemplateService {
    pool: DatabaseConnection,
}

impl TemplateService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 系统模板在前，其后为自己的模板和公开模板（新建的在前）
    pub async fn list_templates(&self, user_id: Option<i64>) -> AppResult<Vec<TemplateDefinition>> {
        let mut visible = Condition::any().add(templates::Column::IsPublic.eq(true));
        if let Some(uid) = user_id {
            visible = visible.add(templates::Column::UserId.eq(uid));
        }

        let custom = templates::Entity::find()
            .filter(visible)
            .order_by_desc(templates::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        let mut list = system_templates();
        list.extend(custom.into_iter().map(TemplateDefinition::from));
        Ok(list)
    }

    /// 不可见的模板与不存在的模板同样返回 NotFound
    pub async fn get_template(&self, id: &str, user_id: Option<i64>) -> AppResult<TemplateDefinition> {
        if let Some(system) = find_system_template(id) {
            return Ok(system);
        }

        let not_found = || AppError::NotFound(format!("Template {id} not found"));
        let uuid = Uuid::parse_str(id).map_err(|_| not_found())?;

        let template: TemplateDefinition = templates::Entity::find_by_id(uuid)
            .one(&self.pool)
            .await?
            .ok_or_else(not_found)?
            .into();

        if !template.visible_to(user_id) {
            return Err(not_found());
        }
        Ok(template)
    }

    pub async fn create_template(
        &self,
        user_id: i64,
        request: CreateTemplateRequest,
    ) -> AppResult<TemplateDefinition> {
        validate_create_request(&request)?;

        let theme = non_empty_or(request.theme.as_deref(), DEFAULT_THEME);
        let item_noun = non_empty_or(request.item_noun.as_deref(), DEFAULT_ITEM_NOUN);
        let counts = request.counts;

        let model = templates::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(request.name.trim().to_string()),
            theme: Set(theme),
            item_noun: Set(item_noun),
            tier1_count: Set(counts.tier1 as i32),
            tier2_count: Set(counts.tier2 as i32),
            tier3_count: Set(counts.tier3 as i32),
            tier4_count: Set(counts.tier4 as i32),
            tier5_count: Set(counts.tier5 as i32),
            is_public: Set(request.is_public),
            created_at: Set(Some(Utc::now())),
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Template created: id={} user_id={} items={}",
            model.id,
            user_id,
            counts.total()
        );
        Ok(model.into())
    }
}

fn non_empty_or(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

pub fn validate_create_request(request: &CreateTemplateRequest) -> AppResult<()> {
    validate_template_name(&request.name)?;

    for field in [request.theme.as_deref(), request.item_noun.as_deref()]
        .into_iter()
        .flatten()
    {
        if field.trim().chars().count() > 32 {
            return Err(AppError::ValidationError(
                "Theme and item noun must be at most 32 characters".to_string(),
            ));
        }
    }

    for tier in Tier::ALL {
        if request.counts.get(tier) > MAX_TIER_COUNT {
            return Err(AppError::ValidationError(format!(
                "Tier {} count exceeds {MAX_TIER_COUNT}",
                tier.rank()
            )));
        }
    }

    let total = request.counts.total();
    if total == 0 || total > MAX_TEMPLATE_ITEMS {
        return Err(AppError::ValidationError(format!(
            "Template must contain between 1 and {MAX_TEMPLATE_ITEMS} items"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gacha::TierCounts;

    fn request(counts: TierCounts) -> CreateTemplateRequest {
        CreateTemplateRequest {
            name: "Office Party".to_string(),
            theme: None,
            item_noun: Some("Ticket".to_string()),
            counts,
            is_public: false,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(validate_create_request(&request(TierCounts::new(1, 2, 3, 4, 5))).is_ok());
    }

    #[test]
    fn test_empty_template_rejected() {
        assert!(validate_create_request(&request(TierCounts::default())).is_err());
    }

    #[test]
    fn test_oversized_tier_rejected() {
        let r = request(TierCounts::new(0, 0, 0, 0, MAX_TIER_COUNT + 1));
        assert!(validate_create_request(&r).is_err());
    }

    #[test]
    fn test_long_noun_rejected() {
        let mut r = request(TierCounts::new(1, 0, 0, 0, 0));
        r.item_noun = Some("n".repeat(33));
        assert!(validate_create_request(&r).is_err());
    }

    #[test]
    fn test_non_empty_or() {
        assert_eq!(non_empty_or(None, "classic"), "classic");
        assert_eq!(non_empty_or(Some("  "), "classic"), "classic");
        assert_eq!(non_empty_or(Some(" neon "), "classic"), "neon");
    }
}
