//! Configuration Lifecycle for FadeBlock
//!
//! Keeps one versioned configuration object valid and durable:
//! - Structural validation of stored candidates
//! - Version migration via a per-version transition table
//! - Reconciliation across the session and local storage tiers
//! - Coalescing of concurrent save requests into serialized writes

mod engine;
mod migration;
mod model;
mod validate;


pub use engine::{ConfigEngine, ProcessFlags, SaveOutcome};
pub use migration::MigrationTable;
pub use model::{
    BuildFlavor, RulesetConfig, CONFIG_KEY, CURRENT_CONFIG_VERSION, LEGACY_CONFIG_VERSION,
    UNVERSIONED,
};
pub use validate::validate;
