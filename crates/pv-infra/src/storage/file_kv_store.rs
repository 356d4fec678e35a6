use anyhow::{Context, Result};
use async_trait::async_trait;
use pv_core::ports::{KeyValueStorePort, StorageError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Key-value store keeping one JSON document per key under a directory.
///
/// `savedPoems` lives at `<dir>/savedPoems.json`. Writes go through a
/// sibling `*.json.tmp` file and a rename, so a reader sees either the
/// previous document or the complete new one.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document backing `key`. Characters outside
    /// `[A-Za-z0-9_-]` are replaced with `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if name.is_empty() {
            name.push('_');
        }
        self.dir.join(format!("{name}.json"))
    }

    async fn atomic_write(&self, path: &Path, content: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create storage dir failed: {}", self.dir.display()))?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp document failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, path).await.with_context(|| {
            format!(
                "rename temp document to target failed: {} -> {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, path = %path.display(), "No stored document yet");
                Ok(None)
            }
            Err(e) => Err(StorageError::Io(format!(
                "read {} failed: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key);
        self.atomic_write(&path, &value)
            .await
            .map_err(|e| StorageError::Io(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("storage"));

        assert_eq!(store.get("savedPoems").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_returns_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("nested").join("storage"));

        store.set("savedPoems", "[]".into()).await.unwrap();
        store.set("savedPoems", r#"[{"id":"a"}]"#.into()).await.unwrap();

        assert_eq!(
            store.get("savedPoems").await.unwrap().as_deref(),
            Some(r#"[{"id":"a"}]"#)
        );
        assert!(temp_dir.path().join("nested/storage/savedPoems.json").exists());
        assert!(!temp_dir.path().join("nested/storage/savedPoems.json.tmp").exists());
    }

    #[test]
    fn keys_are_sanitized_into_file_names() {
        let store = FileKeyValueStore::new("/data");

        assert_eq!(store.path_for("../etc/passwd"), PathBuf::from("/data/___etc_passwd.json"));
        assert_eq!(store.path_for("saved-poems_v2"), PathBuf::from("/data/saved-poems_v2.json"));
        assert_eq!(store.path_for(""), PathBuf::from("/data/_.json"));
    }

    #[tokio::test]
    async fn unreadable_document_is_an_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path());
        // A directory where the document should be cannot be read as text.
        std::fs::create_dir(temp_dir.path().join("savedPoems.json")).unwrap();

        let err = store.get("savedPoems").await.unwrap_err();

        assert!(matches!(err, StorageError::Io(_)));
    }
}
