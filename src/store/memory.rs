use super::{SessionKey, SessionStore};
use crate::error::{AppError, AppResult};
use crate::gacha::SessionState;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<SessionKey, SessionState>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, HashMap<SessionKey, SessionState>>> {
        self.sessions
            .lock()
            .map_err(|_| AppError::InternalError("Session store lock poisoned".to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, key: &SessionKey) -> AppResult<Option<SessionState>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn save(&self, key: &SessionKey, state: &SessionState) -> AppResult<()> {
        self.lock()?.insert(key.clone(), state.clone());
        Ok(())
    }

    fn remove(&self, key: &SessionKey) -> AppResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
