//! Structural validation of candidate configuration values
//!
//! A candidate that fails here must not be migrated or persisted; the
//! caller falls back to defaults rather than attempting partial repair.

use serde_json::Value;

/// Judge whether `candidate` satisfies the current schema shape.
///
/// Deliberately checks only a load-bearing subset of the schema (enough to
/// keep dependent code from crashing), not full structural equality with
/// the defaults, so forward-compatible extra fields pass through untouched.
pub fn validate(candidate: &Value) -> bool {
    let Some(fields) = candidate.as_object() else {
        return false;
    };

    if !fields.get("version").is_some_and(Value::is_string) {
        return false;
    }
    if !fields.get("enabledRulesets").is_some_and(Value::is_array) {
        return false;
    }

    if !fields.get("autoReload").is_some_and(Value::is_boolean) {
        return false;
    }
    if !fields.get("showBlockedCount").is_some_and(Value::is_boolean) {
        return false;
    }

    let Some(features) = fields.get("features").and_then(Value::as_object) else {
        return false;
    };

    let Some(fade_skip) = features.get("youtubeFadeSkip").and_then(Value::as_object) else {
        return false;
    };
    fade_skip.get("enabled").is_some_and(Value::is_boolean)
        && fade_skip.get("fadeThreshold").is_some_and(Value::is_number)
        && fade_skip.get("minDurationMs").is_some_and(Value::is_number)
        && fade_skip.get("debounceMs").is_some_and(Value::is_number)
}
