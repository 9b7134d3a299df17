//! Session Store Module
//!
//! The persisted cache tier: a small key-value store that outlives the
//! in-memory tier but is treated as best-effort storage.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::fs;

use crate::error::{CatalogError, Result};

// == Session Store Trait ==
/// Key-value backend for persisted catalog snapshots.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored text for `key`, `Ok(None)` when nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

// == Memory Session Store ==
/// In-process store with an optional byte quota, shaped like browser session storage.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    items: Mutex<HashMap<String, String>>,
    /// Maximum total bytes of keys plus values, None = unbounded
    quota_bytes: Option<usize>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes pushing it past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let items = self
            .items
            .lock()
            .map_err(|e| CatalogError::CacheRead(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| CatalogError::CacheWrite(e.to_string()))?;

        if let Some(quota) = self.quota_bytes {
            let others: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(CatalogError::CacheWrite(format!(
                    "quota of {} bytes exceeded",
                    quota
                )));
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| CatalogError::CacheWrite(e.to_string()))?;
        items.remove(key);
        Ok(())
    }
}

// == File Session Store ==
/// Stores each key as `<dir>/<key>.json` through `tokio::fs`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CatalogError::CacheRead(e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CatalogError::CacheWrite(e.to_string()))?;

        // Write then rename so readers never see a half-written snapshot
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .await
            .map_err(|e| CatalogError::CacheWrite(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| CatalogError::CacheWrite(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CatalogError::CacheWrite(e.to_string())),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_quota() {
        let store = MemorySessionStore::with_quota(10);

        store.set("k", "12345").await.unwrap();
        let result = store.set("other", "123456789").await;
        assert!(matches!(result, Err(CatalogError::CacheWrite(_))));

        // Replacing an existing key only counts the new value
        store.set("k", "123456789").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("123456789"));
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!(
            "storefront_catalog_session_{}",
            std::process::id()
        ));
        let store = FileSessionStore::new(&dir);

        assert_eq!(store.get("snapshot").await.unwrap(), None);
        store
            .set("snapshot", "{\"fetchedAt\":1,\"data\":[]}")
            .await
            .unwrap();
        assert_eq!(
            store.get("snapshot").await.unwrap().as_deref(),
            Some("{\"fetchedAt\":1,\"data\":[]}")
        );

        store.remove("snapshot").await.unwrap();
        store.remove("snapshot").await.unwrap();
        assert_eq!(store.get("snapshot").await.unwrap(), None);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_file_store_unwritable_dir_is_a_write_error() {
        let blocker = std::env::temp_dir().join(format!(
            "storefront_catalog_blocker_{}",
            std::process::id()
        ));
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = FileSessionStore::new(blocker.join("nested"));
        let result = store.set("snapshot", "{}").await;
        assert!(matches!(result, Err(CatalogError::CacheWrite(_))));

        let _ = std::fs::remove_file(blocker);
    }
}
