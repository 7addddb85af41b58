//! Configuration data model
//!
//! The single persisted entity plus the constants describing its schema
//! lineage. Stored values use camelCase field names; unknown top-level
//! fields ride along untouched so a value written by a newer build can
//! round-trip through this one.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Bumped whenever the persisted shape changes
pub const CURRENT_CONFIG_VERSION: &str = "26";

/// The single legacy schema version with a dedicated migration step
pub const LEGACY_CONFIG_VERSION: &str = "1";

/// Sentinel version assigned to stored objects carrying no version string
pub const UNVERSIONED: &str = "0";

/// Key the configuration is stored under in both tiers
pub const CONFIG_KEY: &str = "rulesetConfig";

/// Build flavor of the host application.
///
/// Consulted only to pick the `strict_block_mode` default; no other
/// behavior branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFlavor {
    /// Full-featured build; strict block mode defaults on.
    Full,
    /// Store-constrained build; strict block mode defaults off.
    Lite,
}

impl BuildFlavor {
    /// Default for `strict_block_mode` under this flavor.
    pub fn strict_block_mode_default(self) -> bool {
        matches!(self, BuildFlavor::Full)
    }
}

impl Default for BuildFlavor {
    fn default() -> Self {
        BuildFlavor::Full
    }
}

/// Main ruleset configuration
///
/// Exactly one instance is authoritative in memory at any time; it is owned
/// by the lifecycle engine and mutated only through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesetConfig {
    /// Schema version tag, compared by identity against
    /// [`CURRENT_CONFIG_VERSION`], never ordered numerically
    pub version: String,

    /// Identifiers of the enabled filtering rulesets
    pub enabled_rulesets: Vec<String>,

    /// Reload affected pages after a ruleset change
    pub auto_reload: bool,

    /// Show the per-site blocked counter on the toolbar badge
    pub show_blocked_count: bool,

    /// Master switch for all filtering
    pub enabled: bool,

    /// Block outright instead of degrading gracefully
    pub strict_block_mode: bool,

    /// Verbose diagnostics and relaxed guards; production builds are
    /// expected to flip this off at build time
    pub developer_mode: bool,

    /// Whether host permissions for broad matching have been granted
    pub has_broad_host_permissions: bool,

    /// Feature flags and tunable parameters, keyed by feature name; each
    /// record is a flat map of numeric/boolean tunables
    pub features: Map<String, Value>,

    /// Per-origin partial overrides of `features`, applied with higher
    /// precedence by the consuming code
    pub site_overrides: Map<String, Value>,

    /// Top-level fields this build does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RulesetConfig {
    /// Build the default configuration template for the given flavor.
    pub fn with_flavor(flavor: BuildFlavor) -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION.to_owned(),
            enabled_rulesets: vec!["default".to_owned()],
            auto_reload: true,
            show_blocked_count: true,
            enabled: true,
            strict_block_mode: flavor.strict_block_mode_default(),
            developer_mode: true,
            has_broad_host_permissions: true,
            features: default_features(),
            site_overrides: default_site_overrides(),
            extra: Map::new(),
        }
    }
}

fn default_features() -> Map<String, Value> {
    let mut features = Map::new();
    features.insert(
        "youtubeFadeSkip".to_owned(),
        json!({
            "enabled": true,
            "fadeThreshold": 10,
            // Fades shorter than this are not worth skipping
            "minDurationMs": 300,
            // Repeated detections inside this window are dropped
            "debounceMs": 1,
            "maxSkipPerVideo": 1000,
        }),
    );
    features
}

fn default_site_overrides() -> Map<String, Value> {
    let mut overrides = Map::new();
    overrides.insert(
        "www.youtube.com".to_owned(),
        json!({
            "youtubeFadeSkip": {
                "enabled": true,
                "fadeThreshold": 300,
                "minDurationMs": 600,
                "throttleMs": 0,
                "midrollAdSkip": true,
                "adDetection": false,
            },
        }),
    );
    overrides
}
