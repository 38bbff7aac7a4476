use crate::errors::ServiceError;
use async_trait::async_trait;

/// Durable, string-keyed storage that survives restarts.
///
/// No transactions and no expiry: every call stands alone and may fail.
/// Implementations can be file-backed, in-memory, or a remote KV.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError>;
    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError>;
    /// Remove a key; returns whether it existed.
    async fn remove(&self, key: &str) -> Result<bool, ServiceError>;
    async fn keys(&self) -> Result<Vec<String>, ServiceError>;
}
