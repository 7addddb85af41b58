//! Configuration lifecycle engine
//!
//! Owns the single authoritative in-memory configuration and the transient
//! process flags, and orchestrates the two lifecycle operations:
//! - `load`: session tier, then local tier, validate, migrate, write the
//!   migrated result back to both tiers
//! - `save`: re-validate, then persist through a coalescing gate so
//!   concurrent requests never interleave writes

use super::migration::MigrationTable;
use super::model::{BuildFlavor, RulesetConfig, CONFIG_KEY};
use super::validate::validate;
use crate::storage::{DualTierStore, StorageResult};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Transient per-process flags, never persisted.
///
/// Created with optimistic defaults at engine construction and mutated
/// only by [`ConfigEngine::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessFlags {
    /// True iff no valid prior configuration existed at startup
    pub first_run: bool,
    /// True iff the engine resumed with an existing valid configuration
    pub wakeup_run: bool,
    /// Escape hatch forced on when storage fails catastrophically
    pub developer_mode: bool,
}

impl Default for ProcessFlags {
    fn default() -> Self {
        Self {
            first_run: true,
            wakeup_run: true,
            developer_mode: false,
        }
    }
}

/// What happened to a save request.
///
/// Save failures are logged and swallowed; callers may inspect the outcome
/// but are not obligated to treat `Failed` as fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Both tiers hold the snapshot that was current when the covering
    /// write ran.
    Persisted,
    /// At least one tier write failed; the in-memory state is unaffected.
    Failed,
}

/// Serializes persistence and collapses bursts of save requests.
///
/// Callers mark `requested`, then queue on `writer`. The first caller
/// through performs the physical write with the in-memory snapshot taken
/// at that moment; callers whose request was already covered by a write
/// that started after it skip the write and report that write's outcome.
struct SaveGate {
    writer: tokio::sync::Mutex<()>,
    requested: AtomicBool,
    last_outcome: Mutex<SaveOutcome>,
}

impl SaveGate {
    fn new() -> Self {
        Self {
            writer: tokio::sync::Mutex::new(()),
            requested: AtomicBool::new(false),
            last_outcome: Mutex::new(SaveOutcome::Persisted),
        }
    }
}

/// Owner of the authoritative configuration instance.
pub struct ConfigEngine {
    config: Arc<RwLock<RulesetConfig>>,
    defaults: RulesetConfig,
    flags: RwLock<ProcessFlags>,
    store: DualTierStore,
    migrations: MigrationTable,
    gate: SaveGate,
}

impl ConfigEngine {
    /// Create an engine over the given tiers. The in-memory instance
    /// starts as a clone of the flavor's defaults; call [`load`] to
    /// populate it from storage.
    ///
    /// [`load`]: ConfigEngine::load
    pub fn new(store: DualTierStore, flavor: BuildFlavor) -> Self {
        let defaults = RulesetConfig::with_flavor(flavor);
        Self {
            config: Arc::new(RwLock::new(defaults.clone())),
            defaults,
            flags: RwLock::new(ProcessFlags::default()),
            store,
            migrations: MigrationTable::new(),
            gate: SaveGate::new(),
        }
    }

    /// Shared handle to the authoritative instance.
    ///
    /// Reads never suspend. Treat the instance as read-mostly: route
    /// mutations through [`update`] (or mutate and then [`save`]) so the
    /// validate-before-persist invariant holds.
    ///
    /// [`update`]: ConfigEngine::update
    /// [`save`]: ConfigEngine::save
    pub fn handle(&self) -> Arc<RwLock<RulesetConfig>> {
        Arc::clone(&self.config)
    }

    /// Clone of the current configuration.
    pub fn current(&self) -> RulesetConfig {
        self.config.read().clone()
    }

    /// Snapshot of the process flags.
    pub fn flags(&self) -> ProcessFlags {
        *self.flags.read()
    }

    /// The immutable default template this engine was built with.
    pub fn defaults(&self) -> &RulesetConfig {
        &self.defaults
    }

    /// Populate the in-memory instance from storage.
    ///
    /// Safe to call repeatedly; each call re-derives the instance from the
    /// tiers. A tier read failure downgrades to defaults-with-flags-set
    /// rather than propagating: the in-memory state keeps its last known
    /// value and `developer_mode` is forced on so the failure is
    /// observable.
    pub async fn load(&self) {
        match self.read_stored().await {
            Ok(Some(stored)) => {
                let migrated = self.migrations.migrate(&stored, &self.defaults);
                *self.config.write() = migrated;
                {
                    let mut flags = self.flags.write();
                    flags.first_run = false;
                    flags.wakeup_run = true;
                }
                // Both tiers get the migrated result
                self.persist_current().await;
            }
            Ok(None) => {
                // Nothing stored anywhere: first run
                *self.config.write() = self.defaults.clone();
                {
                    let mut flags = self.flags.write();
                    flags.first_run = true;
                    flags.wakeup_run = false;
                }
                self.persist_current().await;
            }
            Err(err) => {
                // Storage is unreachable; the in-memory state stays usable
                tracing::warn!("Config load failed: {}", err);
                let mut flags = self.flags.write();
                flags.first_run = true;
                flags.wakeup_run = true;
                flags.developer_mode = true;
            }
        }
    }

    /// Persist the in-memory instance to both tiers.
    ///
    /// Safe to call concurrently from any number of call sites: writes are
    /// strictly serialized, a request made while a write is in flight is
    /// covered by the next write (which reads the in-memory state at the
    /// time it actually runs), and bursts collapse into fewer physical
    /// writes. Last write wins on content.
    pub async fn save(&self) -> SaveOutcome {
        self.reset_if_invalid();

        self.gate.requested.store(true, Ordering::SeqCst);
        let _writer = self.gate.writer.lock().await;
        if !self.gate.requested.swap(false, Ordering::SeqCst) {
            // A write that started after this request already covered it
            return *self.gate.last_outcome.lock();
        }

        let outcome = match self.snapshot() {
            Ok(snapshot) => match self.persist(&snapshot).await {
                Ok(()) => SaveOutcome::Persisted,
                Err(err) => {
                    tracing::warn!("Config save failed: {}", err);
                    SaveOutcome::Failed
                }
            },
            Err(err) => {
                tracing::warn!("Failed to serialize config for saving: {}", err);
                SaveOutcome::Failed
            }
        };
        *self.gate.last_outcome.lock() = outcome;
        outcome
    }

    /// Mutate the in-memory instance under the write lock, then persist.
    pub async fn update<F>(&self, mutate: F) -> SaveOutcome
    where
        F: FnOnce(&mut RulesetConfig),
    {
        {
            let mut config = self.config.write();
            mutate(&mut config);
        }
        self.save().await
    }

    /// First stored value that passes validation: session tier, then local.
    async fn read_stored(&self) -> StorageResult<Option<Value>> {
        if let Some(session) = self.store.read_session(CONFIG_KEY).await? {
            if validate(&session) {
                return Ok(Some(session));
            }
        }

        if let Some(local) = self.store.read_local(CONFIG_KEY).await? {
            if validate(&local) {
                return Ok(Some(local));
            }
        }

        Ok(None)
    }

    /// Reset the instance to a defaults clone if it no longer validates.
    /// A known-invalid object is never persisted.
    fn reset_if_invalid(&self) {
        let mut config = self.config.write();
        let valid = serde_json::to_value(&*config)
            .map(|value| validate(&value))
            .unwrap_or(false);
        if !valid {
            tracing::warn!("In-memory config failed validation, resetting to defaults");
            *config = self.defaults.clone();
        }
    }

    fn snapshot(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&*self.config.read())
    }

    /// Write the current in-memory state to both tiers under the writer
    /// lock; failures are logged, not escalated.
    async fn persist_current(&self) {
        let _writer = self.gate.writer.lock().await;
        let snapshot = match self.snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!("Failed to serialize config for persistence: {}", err);
                return;
            }
        };
        if let Err(err) = self.persist(&snapshot).await {
            tracing::warn!("Failed to persist config: {}", err);
        }
    }

    async fn persist(&self, snapshot: &Value) -> StorageResult<()> {
        self.store.write_session(CONFIG_KEY, snapshot).await?;
        self.store.write_local(CONFIG_KEY, snapshot).await?;
        Ok(())
    }
}
