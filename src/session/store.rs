//! Key/value persistence for the session, kept across restarts.

use crate::error::InventoryError;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, InventoryError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), InventoryError>;
    async fn remove(&self, key: &str) -> Result<(), InventoryError>;
}

#[derive(Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, InventoryError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), InventoryError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), InventoryError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// One JSON object on disk. A missing file reads as empty.
pub struct JsonFileSessionStore {
    path: PathBuf,
    // Serializes the read-modify-write of the file.
    lock: tokio::sync::Mutex<()>,
}

impl JsonFileSessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    fn error(&self, action: &str, e: impl std::fmt::Display) -> InventoryError {
        InventoryError::Session(format!("failed to {action} {}: {e}", self.path.display()))
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, InventoryError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => serde_json::from_str(&text).map_err(|e| self.error("parse", e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(self.error("read", e)),
        }
    }

    async fn save(&self, values: &BTreeMap<String, String>) -> Result<(), InventoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.error("create directory for", e))?;
        }
        let text = serde_json::to_string_pretty(values).map_err(|e| self.error("encode", e))?;
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|e| self.error("write", e))?;
        debug!(path = %self.path.display(), keys = values.len(), "Session saved");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, InventoryError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), InventoryError> {
        let _guard = self.lock.lock().await;
        let mut values = self.load().await?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values).await
    }

    async fn remove(&self, key: &str) -> Result<(), InventoryError> {
        let _guard = self.lock.lock().await;
        let mut values = self.load().await?;
        if values.remove(key).is_some() {
            self.save(&values).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = JsonFileSessionStore::new(&path);
        assert_eq!(store.get("userToken").await.unwrap(), None);
        store.set("userToken", "abc").await.unwrap();
        store.set("SHEET_ID", "sheet-1").await.unwrap();

        let reopened = JsonFileSessionStore::new(&path);
        assert_eq!(reopened.get("userToken").await.unwrap().as_deref(), Some("abc"));
        reopened.remove("userToken").await.unwrap();
        assert_eq!(store.get("userToken").await.unwrap(), None);
        assert_eq!(store.get("SHEET_ID").await.unwrap().as_deref(), Some("sheet-1"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_session_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "not json").unwrap();

        let store = JsonFileSessionStore::new(file.path());
        assert!(matches!(store.get("user").await, Err(InventoryError::Session(_))));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemorySessionStore::new();
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
