//! JSON-file storage tier
//!
//! Durable backing for the local namespace: one pretty-printed JSON file
//! per key under a root directory, written atomically via temp file +
//! rename so a crash mid-write never leaves a half-written value behind.

use super::{StorageArea, StorageError, StorageResult};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

/// Durable key-value store persisting each key as `<root>/<key>.json`.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory holding the stored files.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StorageArea for JsonFileStore {
    async fn read(&self, key: &str) -> StorageResult<Option<Value>> {
        let path = self.path_for(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StorageError::Read {
                    key: key.to_owned(),
                    reason: err.to_string(),
                })
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|err| StorageError::Read {
                key: key.to_owned(),
                reason: err.to_string(),
            })
    }

    async fn write(&self, key: &str, value: &Value) -> StorageResult<()> {
        let write_err = |err: std::io::Error| StorageError::Write {
            key: key.to_owned(),
            reason: err.to_string(),
        };

        tokio::fs::create_dir_all(&self.root).await.map_err(write_err)?;

        let content = serde_json::to_string_pretty(value).map_err(|err| StorageError::Write {
            key: key.to_owned(),
            reason: err.to_string(),
        })?;

        // Write to temp file first, then atomic rename
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &content).await.map_err(write_err)?;
        tokio::fs::rename(&temp_path, &path).await.map_err(write_err)?;

        Ok(())
    }
}
