//! Dual-Tier Storage Adapter
//!
//! Wraps the two key-value namespaces the configuration lifecycle relies on:
//! - A "session" tier scoped to the current process lifetime
//! - A "local" tier that survives restarts
//!
//! Both tiers speak the same opaque async interface ([`StorageArea`]); no
//! validation or migration logic lives here.

mod file;
mod memory;

#[cfg(test)]
mod tests;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Storage adapter error types
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Read failed for key '{key}': {reason}")]
    Read { key: String, reason: String },

    #[error("Write failed for key '{key}': {reason}")]
    Write { key: String, reason: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Asynchronous key-value namespace supplied by the host application.
///
/// One structured value per string key; reads resolve to `None` when the
/// key is absent rather than failing.
#[async_trait]
pub trait StorageArea: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn read(&self, key: &str) -> StorageResult<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &Value) -> StorageResult<()>;
}

/// The two storage namespaces the lifecycle engine reconciles.
pub struct DualTierStore {
    session: Arc<dyn StorageArea>,
    local: Arc<dyn StorageArea>,
}

impl DualTierStore {
    /// Create a store over an ephemeral session tier and a durable local tier.
    pub fn new(session: Arc<dyn StorageArea>, local: Arc<dyn StorageArea>) -> Self {
        Self { session, local }
    }

    /// Read from the session tier.
    pub async fn read_session(&self, key: &str) -> StorageResult<Option<Value>> {
        self.session.read(key).await
    }

    /// Write to the session tier.
    pub async fn write_session(&self, key: &str, value: &Value) -> StorageResult<()> {
        self.session.write(key, value).await
    }

    /// Read from the local tier.
    pub async fn read_local(&self, key: &str) -> StorageResult<Option<Value>> {
        self.local.read(key).await
    }

    /// Write to the local tier.
    pub async fn write_local(&self, key: &str, value: &Value) -> StorageResult<()> {
        self.local.write(key, value).await
    }
}
