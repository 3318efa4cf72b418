//! 会话快照：奖池的 drawn 状态 + 本次会话的抽取历史
//!
//! 只定义快照的形状，存储介质由 `crate::store` 决定。

use super::item::{PrizeItem, PrizePool};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionState {
    pub items: Vec<PrizeItem>,
    #[serde(default)]
    pub history: Vec<PrizeItem>,
}

impl SessionState {
    /// 解析失败视为不存在
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(state) => Some(state),
            Err(e) => {
                log::warn!("Discarding malformed session state: {e}");
                None
            }
        }
    }

    /// 条目集合必须与模板一致：同样的 id，各出现一次，权重在 0..=100
    fn is_usable_for(&self, defaults: &PrizePool) -> bool {
        if self.items.len() != defaults.items.len() {
            return false;
        }
        let known: HashSet<&str> = defaults.items.iter().map(|i| i.id.as_str()).collect();
        let mut seen = HashSet::with_capacity(self.items.len());
        self.items.iter().all(|item| {
            (0.0..=100.0).contains(&item.weight)
                && known.contains(item.id.as_str())
                && seen.insert(item.id.as_str())
        })
    }
}

pub fn serialize(pool: &PrizePool, history: &[PrizeItem]) -> SessionState {
    SessionState {
        items: pool.items.clone(),
        history: history.to_vec(),
    }
}

/// 无快照或快照不可用时回退到模板默认奖池，从不失败
pub fn deserialize(state: Option<SessionState>, defaults: &PrizePool) -> PrizePool {
    Session::restore(state, defaults).pool
}

/// 恢复后的会话：奖池 + 历史
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub pool: PrizePool,
    pub history: Vec<PrizeItem>,
}

impl Session {
    pub fn fresh(defaults: &PrizePool) -> Self {
        Self {
            pool: defaults.clone(),
            history: Vec::new(),
        }
    }

    pub fn restore(state: Option<SessionState>, defaults: &PrizePool) -> Self {
        match state {
            Some(state) if state.is_usable_for(defaults) => Self {
                pool: PrizePool {
                    items: state.items,
                    ..defaults.clone()
                },
                history: state.history,
            },
            Some(_) => {
                log::warn!(
                    "Session state for template {} is inconsistent, using defaults",
                    defaults.id
                );
                Self::fresh(defaults)
            }
            None => Self::fresh(defaults),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        serialize(&self.pool, &self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gacha::builder::{TierCounts, build_pool};
    use crate::gacha::engine::draw_with_rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn defaults() -> PrizePool {
        PrizePool::new(
            "default",
            "Classic Gacha",
            "classic",
            build_pool(&TierCounts::new(1, 2, 3, 4, 5)),
        )
    }

    #[test]
    fn round_trip_preserves_drawn_flags() {
        let template = defaults();
        let mut pool = template.clone();
        let mut rng = StdRng::seed_from_u64(5);
        let mut history = Vec::new();
        for _ in 0..4 {
            if let Some(item) = draw_with_rng(&mut pool, &mut rng).item() {
                history.push(item.clone());
            }
        }

        let state = serialize(&pool, &history);
        let json = serde_json::to_string(&state).unwrap();
        let parsed = SessionState::from_json(&json).unwrap();
        assert_eq!(parsed, state);

        let restored = deserialize(Some(parsed.clone()), &template);
        assert_eq!(restored, pool);

        let session = Session::restore(Some(parsed), &template);
        assert_eq!(session.history, history);
    }

    #[test]
    fn missing_state_falls_back_to_defaults() {
        let template = defaults();
        assert_eq!(deserialize(None, &template), template);
    }

    #[test]
    fn malformed_json_is_treated_as_missing() {
        assert!(SessionState::from_json("{not json").is_none());
        assert!(SessionState::from_json(r#"{"items":[{"id":"x"}]}"#).is_none());
        assert!(
            SessionState::from_json(
                r#"{"items":[{"id":"x","name":"x","tier":9,"weight":1.0,"drawn":false}]}"#
            )
            .is_none()
        );
    }

    #[test]
    fn history_is_optional() {
        let state = SessionState::from_json(
            r#"{"items":[{"id":"a","name":"A","tier":5,"weight":62,"drawn":true}]}"#,
        )
        .unwrap();
        assert!(state.history.is_empty());
        assert!(state.items[0].drawn);
    }

    #[test]
    fn inconsistent_state_falls_back_to_defaults() {
        let template = defaults();
        let mut duplicated = serialize(&template, &[]);
        duplicated.items[1].id = duplicated.items[0].id.clone();
        duplicated.items[0].drawn = true;
        duplicated.history.push(duplicated.items[0].clone());

        let session = Session::restore(Some(duplicated), &template);
        assert_eq!(session.pool, template);
        assert!(session.history.is_empty());

        let empty = SessionState {
            items: Vec::new(),
            history: Vec::new(),
        };
        assert_eq!(deserialize(Some(empty), &template), template);
    }

    #[test]
    fn restore_keeps_template_metadata() {
        let template = defaults();
        let mut state = serialize(&template, &[]);
        state.items[0].drawn = true;
        let pool = deserialize(Some(state), &template);
        assert_eq!(pool.id, template.id);
        assert_eq!(pool.name, template.name);
        assert_eq!(pool.theme, template.theme);
        assert_eq!(pool.drawn_count(), 1);
    }

    #[test]
    fn out_of_range_weight_falls_back_to_defaults() {
        let template = defaults();
        for weight in [150.0, -1.0, f64::NAN] {
            let mut state = serialize(&template, &[]);
            state.items[0].weight = weight;
            state.items[1].drawn = true;
            assert_eq!(deserialize(Some(state), &template), template);
        }
    }

    #[test]
    fn stale_item_set_falls_back_to_defaults() {
        let template = defaults();

        let mut foreign = serialize(&template, &[]);
        foreign.items[0].id = "legendary-99".to_string();
        foreign.items[1].drawn = true;
        assert_eq!(deserialize(Some(foreign), &template), template);

        let mut shorter = serialize(&template, &[]);
        shorter.items.pop();
        shorter.items[0].drawn = true;
        assert_eq!(deserialize(Some(shorter), &template), template);
    }
}
