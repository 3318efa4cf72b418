use super::{SessionKey, SessionStore};
use crate::error::AppResult;
use crate::gacha::SessionState;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 每个会话一个 JSON 文件：`<dir>/<scope>/<template_id>.json`
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path(&self, key: &SessionKey) -> PathBuf {
        self.dir
            .join(key.scope())
            .join(format!("{}.json", key.template_id()))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, key: &SessionKey) -> AppResult<Option<SessionState>> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(SessionState::from_json(&raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 先写临时文件再 rename
    fn save(&self, key: &SessionKey, state: &SessionState) -> AppResult<()> {
        let path = self.path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(state)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &SessionKey) -> AppResult<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SessionOwner;
    use crate::gacha::{PrizeItem, Tier};

    fn temp_store() -> (FileSessionStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("gacha-store-{}", uuid::Uuid::new_v4()));
        (FileSessionStore::new(&dir), dir)
    }

    #[test]
    fn test_save_load_remove() {
        let (store, dir) = temp_store();
        let key = SessionKey::new(&SessionOwner::User(9), "premium").unwrap();
        assert!(store.load(&key).unwrap().is_none());

        let mut item = PrizeItem::new("epic-1", "Epic Premium #1", Tier::Epic, 2.5);
        item.drawn = true;
        let state = SessionState {
            items: vec![item.clone()],
            history: vec![item],
        };
        store.save(&key, &state).unwrap();
        assert!(dir.join("user-9").join("premium.json").exists());
        assert_eq!(store.load(&key).unwrap(), Some(state));

        store.remove(&key).unwrap();
        assert!(store.load(&key).unwrap().is_none());
        store.remove(&key).unwrap();

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_malformed_file_loads_as_none() {
        let (store, dir) = temp_store();
        let key = SessionKey::new(&SessionOwner::new_guest(), "default").unwrap();
        let path = store.path(&key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ broken").unwrap();

        assert!(store.load(&key).unwrap().is_none());

        let _ = fs::remove_dir_all(dir);
    }
}
