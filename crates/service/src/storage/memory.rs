use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::storage::durable::DurableStore;

/// In-process `DurableStore` with switchable read/write failures.
///
/// Used by tests and by callers that want a session that does not outlive
/// the process.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Put a raw value without counting it as a write (for preparing fixtures).
    pub fn seed(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries().insert(key.into(), value.into());
    }

    /// Copy of every entry.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries().clone()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Successful `set`/`remove` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self, key: &str) -> Result<(), ServiceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ServiceError::Store(format!("quota exceeded writing {key}")));
        }
        Ok(())
    }
}

#[async_trait]
impl DurableStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ServiceError::Store(format!("storage unavailable reading {key}")));
        }
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError> {
        self.check_write(key)?;
        self.entries().insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, ServiceError> {
        self.check_write(key)?;
        let existed = self.entries().remove(key).is_some();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(existed)
    }

    async fn keys(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.entries().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_crud() -> Result<(), anyhow::Error> {
        let store = MemoryKvStore::new();
        store.set("a", "1".into()).await?;
        assert_eq!(store.get("a").await?.as_deref(), Some("1"));
        assert!(store.remove("a").await?);
        assert!(!store.remove("a").await?);
        assert!(store.is_empty());
        assert_eq!(store.write_count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn injected_failures() {
        let store = MemoryKvStore::new();
        store.seed("a", "1");
        store.set_fail_writes(true);
        assert!(store.set("b", "2".into()).await.is_err());
        assert!(store.remove("a").await.is_err());
        assert_eq!(store.raw("a").as_deref(), Some("1"));
        store.set_fail_reads(true);
        assert!(store.get("a").await.is_err());
        assert_eq!(store.write_count(), 0);
    }
}
