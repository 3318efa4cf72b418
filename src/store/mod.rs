//! 会话状态存储。键为 (所有者范围, 模板 id)。

pub mod file;
pub mod memory;

use crate::config::{GachaConfig, SessionStoreKind};
use crate::error::{AppError, AppResult};
use crate::gacha::SessionState;
use crate::utils::validate_template_id;
use std::sync::Arc;
use uuid::Uuid;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

/// 会话所有者。访客各自持有一个 uuid，互不共享奖池。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionOwner {
    User(i64),
    Guest(Uuid),
}

impl SessionOwner {
    /// 新访客
    pub fn new_guest() -> Self {
        SessionOwner::Guest(Uuid::new_v4())
    }

    /// 客户端带回的访客 id，只接受 uuid
    pub fn parse_guest(raw: &str) -> AppResult<Self> {
        Uuid::parse_str(raw.trim())
            .map(SessionOwner::Guest)
            .map_err(|_| AppError::ValidationError("Invalid guest session id".to_string()))
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            SessionOwner::User(id) => Some(*id),
            SessionOwner::Guest(_) => None,
        }
    }

    fn scope(&self) -> String {
        match self {
            SessionOwner::User(id) => format!("user-{id}"),
            SessionOwner::Guest(id) => format!("guest-{}", id.hyphenated()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    scope: String,
    template_id: String,
}

impl SessionKey {
    pub fn new(owner: &SessionOwner, template_id: &str) -> AppResult<Self> {
        validate_template_id(template_id)?;
        Ok(Self {
            scope: owner.scope(),
            template_id: template_id.to_string(),
        })
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.scope, self.template_id)
    }
}

pub trait SessionStore: Send + Sync {
    /// 不存在或无法解析时返回 None
    fn load(&self, key: &SessionKey) -> AppResult<Option<SessionState>>;
    fn save(&self, key: &SessionKey, state: &SessionState) -> AppResult<()>;
    fn remove(&self, key: &SessionKey) -> AppResult<()>;
}

pub fn create_store(config: &GachaConfig) -> Arc<dyn SessionStore> {
    match config.session_store {
        SessionStoreKind::Memory => Arc::new(MemorySessionStore::new()),
        SessionStoreKind::File => Arc::new(FileSessionStore::new(&config.session_dir)),
    }
}
