use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::gacha::{DrawResult, PrizeItem, PrizePool, Session, TemplateDefinition, Tier};
use crate::i18n::Language;

/// 语言参数 (?lang=ko)
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct LangQuery {
    pub lang: Option<String>,
}

impl LangQuery {
    pub fn resolve(&self, default: Language) -> Language {
        self.lang
            .as_deref()
            .and_then(Language::parse)
            .unwrap_or(default)
    }
}

/// 带本地化等级名的条目
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemView {
    pub id: String,
    pub name: String,
    #[schema(value_type = u8)]
    pub tier: Tier,
    pub tier_key: String,
    pub tier_label: String,
    pub weight: f64,
    pub drawn: bool,
}

impl ItemView {
    pub fn new(item: &PrizeItem, lang: Language) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            tier: item.tier,
            tier_key: item.tier.as_str().to_string(),
            tier_label: lang.tier_name(item.tier).to_string(),
            weight: item.weight,
            drawn: item.drawn,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TierStat {
    #[schema(value_type = u8)]
    pub tier: Tier,
    pub tier_label: String,
    pub total: usize,
    pub drawn: usize,
    pub remaining: usize,
}

pub fn tier_stats(pool: &PrizePool, lang: Language) -> Vec<TierStat> {
    Tier::ALL
        .iter()
        .map(|&tier| {
            let total = pool.items.iter().filter(|i| i.tier == tier).count();
            let drawn = pool
                .items
                .iter()
                .filter(|i| i.tier == tier && i.drawn)
                .count();
            TierStat {
                tier,
                tier_label: lang.tier_name(tier).to_string(),
                total,
                drawn,
                remaining: total - drawn,
            }
        })
        .collect()
}

/// 当前会话
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    pub template_id: String,
    pub template_name: String,
    pub theme: String,
    pub total: usize,
    pub drawn: usize,
    pub remaining: usize,
    pub items: Vec<ItemView>,
    pub history: Vec<ItemView>,
    pub tiers: Vec<TierStat>,
}

impl SessionResponse {
    pub fn new(template: &TemplateDefinition, session: &Session, lang: Language) -> Self {
        let pool = &session.pool;
        Self {
            template_id: template.id.clone(),
            template_name: template.name.clone(),
            theme: template.theme.clone(),
            total: pool.total_count(),
            drawn: pool.drawn_count(),
            remaining: pool.remaining_count(),
            items: pool.items.iter().map(|i| ItemView::new(i, lang)).collect(),
            history: session.history.iter().map(|i| ItemView::new(i, lang)).collect(),
            tiers: tier_stats(pool, lang),
        }
    }
}

/// 单次抽取
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawResponse {
    pub exhausted: bool,
    pub item: Option<ItemView>,
    pub remaining: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DrawResponse {
    pub fn new(result: &DrawResult, remaining: usize, total: usize, lang: Language) -> Self {
        match result {
            DrawResult::Drawn(item) => Self {
                exhausted: false,
                item: Some(ItemView::new(item, lang)),
                remaining,
                total,
                message: None,
            },
            DrawResult::Exhausted => Self {
                exhausted: true,
                item: None,
                remaining,
                total,
                message: Some(lang.completed_message().to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gacha::{TierCounts, build_pool};

    #[test]
    fn test_lang_query_resolution() {
        let q = LangQuery {
            lang: Some("ko".into()),
        };
        assert_eq!(q.resolve(Language::En), Language::Ko);
        let q = LangQuery {
            lang: Some("xx".into()),
        };
        assert_eq!(q.resolve(Language::Ko), Language::Ko);
        assert_eq!(LangQuery::default().resolve(Language::En), Language::En);
    }

    #[test]
    fn test_tier_stats() {
        let mut pool = PrizePool::new(
            "p",
            "P",
            "classic",
            build_pool(&TierCounts::new(1, 0, 0, 0, 3)),
        );
        pool.items[1].drawn = true;
        let stats = tier_stats(&pool, Language::En);
        assert_eq!(stats.len(), 5);
        assert_eq!(stats[0].total, 1);
        assert_eq!(stats[0].tier_label, "Legendary");
        assert_eq!(stats[4].total, 3);
        assert_eq!(stats[4].drawn, 1);
        assert_eq!(stats[4].remaining, 2);
        assert_eq!(stats[2].total, 0);
    }

    #[test]
    fn test_draw_response_messages() {
        let item = PrizeItem::new("legendary-1", "Legendary Item #1", Tier::Legendary, 0.5);
        let drawn = DrawResponse::new(&DrawResult::Drawn(item), 3, 4, Language::Ko);
        assert!(!drawn.exhausted);
        assert_eq!(drawn.item.unwrap().tier_label, "전설");
        assert!(drawn.message.is_none());

        let done = DrawResponse::new(&DrawResult::Exhausted, 0, 4, Language::En);
        assert!(done.exhausted);
        assert!(done.item.is_none());
        assert_eq!(done.message.as_deref(), Some("All items have been drawn!"));
    }
}
