use std::{collections::HashMap, hash::Hash, io::ErrorKind, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `HashMap<K, V>` to a JSON file and provides simple CRUD helpers.
/// Every mutation rewrites the whole file through a sibling temp file and a
/// rename, so a crash leaves either the old or the new map on disk.
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. Creates the file with an empty map if missing.
    ///
    /// A corrupt map file is logged and replaced by an empty map on the next write.
    /// Any other read error is returned and the file is left alone.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %file_path.display(), error = %e, "store file is corrupt; starting empty");
                HashMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty: HashMap<K, V> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(ServiceError::store)?)
                    .await
                    .map_err(ServiceError::store)?;
                empty
            }
            Err(e) => return Err(ServiceError::store(e)),
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    async fn save(&self, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map).map_err(ServiceError::store)?;
        let tmp = self.file_path.with_extension("json.tmp");
        fs::write(&tmp, data).await.map_err(ServiceError::store)?;
        fs::rename(&tmp, &self.file_path).await.map_err(ServiceError::store)?;
        Ok(())
    }

    /// List all entries as `(key, value)` pairs.
    pub async fn list(&self) -> Vec<(K, V)> {
        let map = self.inner.read().await;
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// List all keys.
    pub async fn keys(&self) -> Vec<K> {
        let map = self.inner.read().await;
        map.keys().cloned().collect()
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Insert or update a value by key and persist.
    ///
    /// The in-memory map only changes once the file write succeeded.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        next.insert(key, value);
        self.save(&next).await?;
        *map = next;
        Ok(())
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove(&self, key: &K) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        if !map.contains_key(key) {
            return Ok(false);
        }
        let mut next = map.clone();
        next.remove(key);
        self.save(&next).await?;
        *map = next;
        Ok(true)
    }
}
