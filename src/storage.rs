use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::{storage_error, Error};

/// String key-value persistence, the role local storage plays in a browser.
/// Values are opaque text; callers own their encoding.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;
    async fn set(&self, key: &str, value: String) -> Result<(), Error>;
    async fn remove(&self, key: &str) -> Result<(), Error>;
}

pub type DynStore = Arc<dyn KeyValueStore>;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let entries = self.entries.lock().map_err(storage_error)?;

        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), Error> {
        let mut entries = self.entries.lock().map_err(storage_error)?;
        entries.insert(key.into(), value);

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        let mut entries = self.entries.lock().map_err(storage_error)?;
        entries.remove(key);

        Ok(())
    }
}

/// Keeps every key in one JSON object on disk. Each call reads the whole
/// file and each write replaces it.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<HashMap<String, String>, Error> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), Error> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&self.path, bytes).await?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    #[tracing::instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;

        Ok(entries.remove(key))
    }

    #[tracing::instrument(skip(self, value))]
    async fn set(&self, key: &str, value: String) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.into(), value);

        self.write_all(&entries).await
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;

        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();

        block_on(async {
            assert_eq!(store.get("k").await.unwrap(), None);

            store.set("k", "v".into()).await.unwrap();
            assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

            store.remove("k").await.unwrap();
            assert_eq!(store.get("k").await.unwrap(), None);
        });
    }

    #[test]
    fn file_store_survives_reopening() {
        let path = std::env::temp_dir().join(format!("roteiro-{}.json", uuid::Uuid::new_v4()));

        block_on(async {
            let store = FileStore::new(&path);
            assert_eq!(store.get("favoriteRoutes").await.unwrap(), None);

            store.set("favoriteRoutes", "[]".into()).await.unwrap();
            store.set("auth_token", "abc".into()).await.unwrap();

            let reopened = FileStore::new(&path);
            assert_eq!(
                reopened.get("favoriteRoutes").await.unwrap().as_deref(),
                Some("[]")
            );

            reopened.remove("auth_token").await.unwrap();
            assert_eq!(store.get("auth_token").await.unwrap(), None);
        });

        let _ = std::fs::remove_file(&path);
    }
}
