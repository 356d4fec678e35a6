use async_trait::async_trait;

use super::StorageError;

/// Durable string key-value storage (the browser-local-storage shape).
///
/// Values are opaque UTF-8 payloads; each `set` replaces whatever was
/// stored under the key before.
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}
