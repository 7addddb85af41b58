//! Schema version migration
//!
//! A transition table from stored schema version to the current one: each
//! recognized version maps to one migration step, and everything else goes
//! through a conservative fallback. Adding a schema version means adding
//! one table entry.
//!
//! Every step is total: whatever the stored object looks like, the result
//! is a fully current-schema configuration.

use super::model::{RulesetConfig, CURRENT_CONFIG_VERSION, LEGACY_CONFIG_VERSION, UNVERSIONED};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One migration step: copy what survives from the stored fields into a
/// defaults clone.
type MigrationStep = fn(&Map<String, Value>, &mut RulesetConfig);

/// Table of migration steps keyed by source schema version.
pub struct MigrationTable {
    steps: HashMap<&'static str, MigrationStep>,
    fallback: MigrationStep,
}

impl MigrationTable {
    /// Build the table with all registered migration steps.
    pub fn new() -> Self {
        let mut steps: HashMap<&'static str, MigrationStep> = HashMap::new();
        steps.insert(UNVERSIONED, from_unversioned);
        steps.insert(LEGACY_CONFIG_VERSION, from_legacy);
        steps.insert(CURRENT_CONFIG_VERSION, from_current);

        Self {
            steps,
            fallback: from_unknown_version,
        }
    }

    /// Transform `old` into a current-schema configuration.
    ///
    /// Starts from a clone of `defaults`, applies the step registered for
    /// `old`'s version (or the fallback), and stamps the current version.
    pub fn migrate(&self, old: &Value, defaults: &RulesetConfig) -> RulesetConfig {
        let empty = Map::new();
        let fields = old.as_object().unwrap_or(&empty);

        // Objects with no version string are treated as pre-versioning
        let from = fields
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or(UNVERSIONED);

        let step = self.steps.get(from).copied().unwrap_or(self.fallback);

        let mut config = defaults.clone();
        step(fields, &mut config);
        config.version = CURRENT_CONFIG_VERSION.to_owned();
        config
    }
}

impl Default for MigrationTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level fields the current schema knows about; anything else carries
/// through the `from_current` merge untouched.
const KNOWN_FIELDS: [&str; 10] = [
    "version",
    "enabledRulesets",
    "autoReload",
    "showBlockedCount",
    "enabled",
    "strictBlockMode",
    "developerMode",
    "hasBroadHostPermissions",
    "features",
    "siteOverrides",
];

/// Pre-versioning objects hold nothing worth preserving.
fn from_unversioned(_old: &Map<String, Value>, _config: &mut RulesetConfig) {}

/// Copy forward only the fields that existed in the legacy schema,
/// coercing each to the expected shape.
fn from_legacy(old: &Map<String, Value>, config: &mut RulesetConfig) {
    config.enabled_rulesets = ruleset_list(old.get("enabledRulesets"));
    config.auto_reload = truthy(old.get("autoReload"));
    config.show_blocked_count = truthy(old.get("showBlockedCount"));
    config.strict_block_mode = truthy(old.get("strictBlockMode"));
    config.developer_mode = truthy(old.get("developerMode"));
    config.has_broad_host_permissions = truthy(old.get("hasBroadHostPermissions"));
}

/// Already on the latest schema: stored fields win field-by-field over the
/// defaults, so any newly introduced default the stored object lacks is
/// picked up.
///
/// The merge is shallow: `features` and `siteOverrides` are replaced
/// wholesale, never merged recursively, so a partially-populated nested
/// record in storage also drops its sibling defaults.
fn from_current(old: &Map<String, Value>, config: &mut RulesetConfig) {
    if let Some(list) = old.get("enabledRulesets") {
        config.enabled_rulesets = ruleset_list(Some(list));
    }
    if let Some(flag) = old.get("autoReload").and_then(Value::as_bool) {
        config.auto_reload = flag;
    }
    if let Some(flag) = old.get("showBlockedCount").and_then(Value::as_bool) {
        config.show_blocked_count = flag;
    }
    if let Some(flag) = old.get("enabled").and_then(Value::as_bool) {
        config.enabled = flag;
    }
    if let Some(flag) = old.get("strictBlockMode").and_then(Value::as_bool) {
        config.strict_block_mode = flag;
    }
    if let Some(flag) = old.get("developerMode").and_then(Value::as_bool) {
        config.developer_mode = flag;
    }
    if let Some(flag) = old.get("hasBroadHostPermissions").and_then(Value::as_bool) {
        config.has_broad_host_permissions = flag;
    }
    if let Some(features) = old.get("features").and_then(Value::as_object) {
        config.features = features.clone();
    }
    if let Some(overrides) = old.get("siteOverrides").and_then(Value::as_object) {
        config.site_overrides = overrides.clone();
    }
    for (key, value) in old {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            config.extra.insert(key.clone(), value.clone());
        }
    }
}

/// Unknown version: be conservative and only copy the obvious safe field.
fn from_unknown_version(old: &Map<String, Value>, config: &mut RulesetConfig) {
    config.enabled_rulesets = ruleset_list(old.get("enabledRulesets"));
}

/// JS-style truthiness, used when coercing legacy toggles.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}

/// String elements of a stored ruleset list; empty when absent or not a
/// sequence.
fn ruleset_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
