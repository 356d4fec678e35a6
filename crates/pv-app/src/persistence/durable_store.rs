use std::fmt;
use std::sync::Arc;

use pv_core::ports::KeyValueStorePort;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

/// JSON values under string keys, over an optional durable backend.
///
/// Never fails: reads fall back to the caller's initial value and writes
/// only log when the backend is missing, broken or holds garbage.
#[derive(Clone, Default)]
pub struct DurableKeyedStore {
    backend: Option<Arc<dyn KeyValueStorePort>>,
}

impl DurableKeyedStore {
    pub fn new(backend: Arc<dyn KeyValueStorePort>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A store with no durable backend (pre-render / headless contexts).
    pub fn detached() -> Self {
        Self { backend: None }
    }

    pub fn is_attached(&self) -> bool {
        self.backend.is_some()
    }

    /// Reads and deserializes the value under `key`, or returns `init()`.
    pub async fn read<T, F>(&self, key: &str, init: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let Some(backend) = &self.backend else {
            debug!(key, "No durable backend; using initial value");
            return init();
        };

        match backend.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!(key, error = %err, "Error reading stored value; using initial value");
                    init()
                }
            },
            Ok(None) => init(),
            Err(err) => {
                warn!(key, error = %err, "Error reading durable storage; using initial value");
                init()
            }
        }
    }

    /// Serializes `value` and replaces whatever was stored under `key`.
    pub async fn write<T>(&self, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        let Some(backend) = &self.backend else {
            debug!(key, "No durable backend; skipping write");
            return;
        };

        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(key, error = %err, "Error serializing value for durable storage");
                return;
            }
        };

        if let Err(err) = backend.set(key, payload).await {
            warn!(key, error = %err, "Error writing durable storage");
        }
    }
}

impl fmt::Debug for DurableKeyedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DurableKeyedStore")
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pv_core::ports::StorageError;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct FakeBackend {
        entries: Mutex<HashMap<String, String>>,
        fail_reads: bool,
        fail_writes: bool,
    }

    #[async_trait]
    impl KeyValueStorePort for FakeBackend {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads {
                return Err(StorageError::Io("disk on fire".into()));
            }
            Ok(self.entries.lock().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Quota("full".into()));
            }
            self.entries.lock().await.insert(key.to_string(), value);
            Ok(())
        }
    }

    #[tokio::test]
    async fn detached_store_returns_initial_value() {
        let store = DurableKeyedStore::detached();
        store.write("numbers", &vec![1, 2, 3]).await;

        let value: Vec<i32> = store.read("numbers", Vec::new).await;
        assert!(value.is_empty());
        assert!(!store.is_attached());
    }

    #[tokio::test]
    async fn missing_key_returns_initial_value() {
        let store = DurableKeyedStore::new(Arc::new(FakeBackend::default()));
        let value: Vec<String> = store.read("absent", || vec!["seed".to_string()]).await;
        assert_eq!(value, vec!["seed".to_string()]);
    }

    #[tokio::test]
    async fn write_replaces_previous_content() {
        let backend = Arc::new(FakeBackend::default());
        let store = DurableKeyedStore::new(backend.clone());

        store.write("numbers", &vec![1, 2, 3]).await;
        store.write("numbers", &vec![9]).await;

        assert_eq!(
            backend.entries.lock().await.get("numbers").cloned(),
            Some("[9]".to_string())
        );
        let value: Vec<i32> = store.read("numbers", Vec::new).await;
        assert_eq!(value, vec![9]);
    }

    #[tokio::test]
    async fn malformed_payload_falls_back_to_initial_value() {
        let backend = Arc::new(FakeBackend::default());
        backend
            .entries
            .lock()
            .await
            .insert("numbers".into(), "{not json".into());
        let store = DurableKeyedStore::new(backend);

        let value: Vec<i32> = store.read("numbers", || vec![42]).await;
        assert_eq!(value, vec![42]);
    }

    #[tokio::test]
    async fn backend_failures_are_swallowed() {
        let backend = Arc::new(FakeBackend {
            fail_reads: true,
            fail_writes: true,
            ..Default::default()
        });
        let store = DurableKeyedStore::new(backend.clone());

        store.write("numbers", &vec![1]).await;
        let value: Vec<i32> = store.read("numbers", Vec::new).await;

        assert!(value.is_empty());
        assert!(backend.entries.lock().await.is_empty());
    }
}
