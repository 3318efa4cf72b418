use crate::entities::gacha_result_entity as results;
use crate::error::AppResult;
use crate::gacha::PrizeItem;
use crate::models::{GachaResultResponse, HistoryQuery, PaginatedResponse, PaginationParams};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tokio::sync::mpsc;

/// 抽取完成后发出的消息，由后台任务写入结果表
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecorded {
    pub user_id: i64,
    pub template_id: String,
    pub template_name: String,
    pub item: PrizeItem,
}

pub type RecorderSender = mpsc::UnboundedSender<DrawRecorded>;
pub type RecorderReceiver = mpsc::UnboundedReceiver<DrawRecorded>;

pub fn recorder_channel() -> (RecorderSender, RecorderReceiver) {
    mpsc::unbounded_channel()
}

#[derive(Clone)]
pub struct ResultService {
    pool: DatabaseConnection,
    history_limit: u32,
}

impl ResultService {
    pub fn new(pool: DatabaseConnection, history_limit: u32) -> Self {
        Self {
            pool,
            history_limit,
        }
    }

    pub async fn record(&self, event: &DrawRecorded) -> AppResult<()> {
        results::ActiveModel {
            user_id: Set(event.user_id),
            template_id: Set(event.template_id.clone()),
            template_name: Set(event.template_name.clone()),
            item_id: Set(event.item.id.clone()),
            item_name: Set(event.item.name.clone()),
            tier: Set(event.item.tier.rank() as i16),
            drawn_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(())
    }

    /// 写入失败只记日志，不影响已经完成的抽取
    pub async fn run_recorder(self, mut rx: RecorderReceiver) {
        while let Some(event) = rx.recv().await {
            if let Err(e) = self.record(&event).await {
                log::error!(
                    "Failed to save gacha result user_id={} template={} item={}: {:?}",
                    event.user_id,
                    event.template_id,
                    event.item.id,
                    e
                );
            }
        }
        log::info!("Gacha result recorder stopped");
    }

    /// 用户历史（倒序）
    pub async fn list_history(
        &self,
        user_id: i64,
        query: &HistoryQuery,
    ) -> AppResult<PaginatedResponse<GachaResultResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let limit = params.get_per_page(self.history_limit);
        let offset = params.get_offset(self.history_limit);

        let mut base_query = results::Entity::find().filter(results::Column::UserId.eq(user_id));
        if let Some(template_id) = query.template_id.as_deref() {
            base_query = base_query.filter(results::Column::TemplateId.eq(template_id));
        }

        let total = base_query.clone().count(&self.pool).await?;

        let items = base_query
            .order_by_desc(results::Column::DrawnAt)
            .order_by_desc(results::Column::Id)
            .limit(limit as u64)
            .offset(offset)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(Into::into).collect(),
            params.get_page(),
            limit,
            total,
        ))
    }
}
