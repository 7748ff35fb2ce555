//! Key/value document storage backing the in-memory store
//!
//! Every collection lives under one fixed key as a JSON array. The file
//! backend writes `<data_dir>/<key>.json`; the memory backend is used by tests
//! and for throwaway instances.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::error::AppResult;

pub const USERS_KEY: &str = "uic_users";
pub const EQUIPMENT_KEY: &str = "uic_equipment";
pub const ROOMS_KEY: &str = "uic_rooms";
pub const RESERVATIONS_KEY: &str = "uic_reservations";

#[async_trait]
pub trait Storage: Send + Sync {
    /// Raw document stored under `key`, `None` if the key was never written
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> AppResult<()>;
}

/// One JSON file per key inside a directory
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the data directory
    pub async fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        // Write to a sibling file first so a crash never leaves a truncated document
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

/// Process-local storage
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_storage_round_trip() {
        let dir = std::env::temp_dir().join(format!("avres-storage-{}", uuid::Uuid::new_v4()));
        let storage = FileStorage::open(&dir).await.unwrap();

        assert_eq!(storage.get(USERS_KEY).await.unwrap(), None);
        storage.set(USERS_KEY, "[]").await.unwrap();
        assert_eq!(storage.get(USERS_KEY).await.unwrap().as_deref(), Some("[]"));
        assert!(dir.join("uic_users.json").exists());

        storage.set(USERS_KEY, r#"[{"id":"1"}]"#).await.unwrap();
        assert_eq!(
            storage.get(USERS_KEY).await.unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
        assert!(!dir.join("uic_users.json.tmp").exists());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.set(ROOMS_KEY, "[1]").await.unwrap();
        assert_eq!(storage.get(ROOMS_KEY).await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.get(EQUIPMENT_KEY).await.unwrap(), None);
    }
}
