use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::storage::durable::DurableStore;
use crate::storage::json_map_store::JsonMapStore;

/// File-backed `DurableStore` for the session mirror.
/// Keeps a map of `key -> serialized value` persisted as JSON.
#[derive(Clone)]
pub struct FileKvStore {
    store: Arc<JsonMapStore<String, String>>,
}

impl FileKvStore {
    /// Initialize the store from the given file path. Creates the file if missing.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, String>::new(path).await?;
        Ok(Arc::new(Self { store }))
    }

    /// List all entries as `(key, value)` pairs.
    pub async fn list(&self) -> Vec<(String, String)> {
        self.store.list().await
    }
}

#[async_trait]
impl DurableStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.store.get(&key.to_string()).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError> {
        self.store.insert(key.to_string(), value).await
    }

    async fn remove(&self, key: &str) -> Result<bool, ServiceError> {
        self.store.remove(&key.to_string()).await
    }

    async fn keys(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.store.keys().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn file_kv_store_survives_reopen() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("portal_session_{}.json", Uuid::new_v4()));
        let store = FileKvStore::new(&tmp).await?;

        // initially empty
        assert!(store.keys().await?.is_empty());

        store.set("jobportal.user", r#"{"userId":7,"role":"EMPLOYER"}"#.to_string()).await?;
        store.set("jobportal.token", "tok123".to_string()).await?;
        assert!(store.remove("jobportal.token").await?);

        // reload store from disk to ensure persistence
        let store2 = FileKvStore::new(&tmp).await?;
        let list = store2.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(store2.get("jobportal.token").await?, None);
        assert!(store2.get("jobportal.user").await?.unwrap().contains("EMPLOYER"));

        // cleanup
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
