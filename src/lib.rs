//! FadeBlock configuration lifecycle
//!
//! This crate keeps the FadeBlock content filter's single versioned
//! configuration object durable and trustworthy:
//! - Schema validation of stored candidates before anything depends on them
//! - Version migration through a per-version transition table
//! - Reconciliation across an ephemeral session tier and a durable local tier
//! - Coalescing of concurrent save requests into strictly serialized writes
//!
//! What each configuration flag *controls* lives with the consuming code;
//! this crate only guarantees a structurally valid, schema-current instance
//! is available in memory and kept consistent with storage.

pub mod config;
pub mod storage;

// Re-export commonly used items
pub use config::{
    BuildFlavor, ConfigEngine, ProcessFlags, RulesetConfig, SaveOutcome, CONFIG_KEY,
    CURRENT_CONFIG_VERSION,
};
pub use storage::{
    DualTierStore, JsonFileStore, MemoryStore, StorageArea, StorageError, StorageResult,
};
