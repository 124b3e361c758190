//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`ReverieSettings::default()`]
//! 2. If `~/.reverie/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//! 4. [`ReverieSettings::validate`]
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::{LucidTrendOrder, ReverieSettings, TopNSettings};

/// Resolve the path to the settings file (`~/.reverie/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".reverie").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<ReverieSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<ReverieSettings> {
    let mut settings = read_layered(path)?;
    apply_env_overrides(&mut settings);
    settings.validate();
    Ok(settings)
}

fn read_layered(path: &Path) -> Result<ReverieSettings> {
    let defaults = serde_json::to_value(ReverieSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        if !user.is_object() {
            return Err(SettingsError::InvalidValue(format!(
                "{} must contain a JSON object",
                path.display()
            )));
        }
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Integers must parse and fall within the documented range. Invalid values
/// are ignored with a warning and the file/default value stays.
pub fn apply_env_overrides(settings: &mut ReverieSettings) {
    // ── Analytics ───────────────────────────────────────────────────
    let analytics = &mut settings.analytics;
    if let Some(v) = read_env_string("REVERIE_TIMEZONE") {
        analytics.timezone = v;
    }
    if let Some(v) = read_env_usize("REVERIE_MOOD_TREND_DAYS", 1, 366) {
        analytics.mood_trend_days = v;
    }
    if let Some(v) = read_env_usize("REVERIE_LUCID_TREND_MONTHS", 1, 120) {
        analytics.lucid_trend_months = v;
    }
    if let Some(v) = read_env_usize("REVERIE_TOP_N", 1, 100) {
        analytics.top_n = TopNSettings::uniform(v);
    }
    if let Some(v) = read_env_string("REVERIE_LUCID_TREND_ORDER") {
        match parse_lucid_order(&v) {
            Some(order) => analytics.lucid_trend_order = order,
            None => {
                tracing::warn!(
                    key = "REVERIE_LUCID_TREND_ORDER",
                    value = %v,
                    "invalid env var, ignoring"
                );
            }
        }
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = read_env_string("REVERIE_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a lucid trend order name (case-insensitive).
pub fn parse_lucid_order(val: &str) -> Option<LucidTrendOrder> {
    serde_json::from_value(Value::String(val.trim().to_lowercase())).ok()
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn write_settings(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({"analytics": {"timezone": "UTC", "moodTrendDays": 30}});
        let source = serde_json::json!({"analytics": {"moodTrendDays": 14}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["analytics"]["moodTrendDays"], 14);
        assert_eq!(merged["analytics"]["timezone"], "UTC");
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let source = serde_json::json!({"items": [4]});
        assert_eq!(deep_merge(target, source)["items"], serde_json::json!([4]));
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_new_keys_added() {
        let merged = deep_merge(serde_json::json!({"a": 1}), serde_json::json!({"b": 2}));
        assert_eq!(merged, serde_json::json!({"a": 1, "b": 2}));
    }

    #[test]
    fn merge_primitive_replaces_object() {
        let target = serde_json::json!({"a": {"nested": true}});
        let source = serde_json::json!({"a": 42});
        assert_eq!(deep_merge(target, source)["a"], 42);
    }

    #[test]
    fn merge_empty_source() {
        let target = serde_json::json!({"a": 1, "b": {"c": 2}});
        assert_eq!(deep_merge(target.clone(), serde_json::json!({})), target);
    }

    // ── read_layered ────────────────────────────────────────────────

    #[test]
    fn missing_file_returns_defaults() {
        let settings = read_layered(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings, ReverieSettings::default());
    }

    #[test]
    fn empty_object_returns_defaults() {
        let (_dir, path) = write_settings("{}");
        assert_eq!(read_layered(&path).unwrap(), ReverieSettings::default());
    }

    #[test]
    fn partial_file_overrides() {
        let (_dir, path) = write_settings(
            r#"{"analytics": {"timezone": "Europe/Paris", "topN": {"topics": 3}}}"#,
        );
        let settings = read_layered(&path).unwrap();
        assert_eq!(settings.analytics.timezone, "Europe/Paris");
        assert_eq!(settings.analytics.top_n.topics, 3);
        assert_eq!(settings.analytics.top_n.symbols, 10);
        assert_eq!(settings.analytics.mood_trend_days, 30);
    }

    #[test]
    fn lucid_order_from_file() {
        let (_dir, path) = write_settings(r#"{"analytics": {"lucidTrendOrder": "traversal"}}"#);
        let settings = read_layered(&path).unwrap();
        assert_eq!(settings.analytics.lucid_trend_order, LucidTrendOrder::Traversal);
    }

    #[test]
    fn invalid_json_returns_error() {
        let (_dir, path) = write_settings("not valid json");
        assert_matches!(read_layered(&path), Err(SettingsError::Json(_)));
    }

    #[test]
    fn non_object_returns_error() {
        let (_dir, path) = write_settings("[1, 2]");
        assert_matches!(read_layered(&path), Err(SettingsError::InvalidValue(_)));
    }

    #[test]
    fn wrong_field_type_returns_error() {
        let (_dir, path) = write_settings(r#"{"analytics": {"moodTrendDays": "lots"}}"#);
        assert_matches!(read_layered(&path), Err(SettingsError::Json(_)));
    }

    #[test]
    fn validation_runs_after_load() {
        // REVERIE_* vars are not set by the test harness.
        let (_dir, path) = write_settings(
            r#"{"analytics": {"timezone": "Atlantis/Capital", "moodTrendDays": 0}}"#,
        );
        let mut settings = read_layered(&path).unwrap();
        settings.validate();
        assert_eq!(settings.analytics.timezone, "UTC");
        assert_eq!(settings.analytics.mood_trend_days, 30);
    }

    // ── parsing ─────────────────────────────────────────────────────

    #[test]
    fn parse_usize_valid() {
        assert_eq!(parse_usize_range("50", 1, 100), Some(50));
        assert_eq!(parse_usize_range(" 7 ", 1, 100), Some(7));
        assert_eq!(parse_usize_range("366", 1, 366), Some(366));
    }

    #[test]
    fn parse_usize_out_of_range() {
        assert_eq!(parse_usize_range("0", 1, 100), None);
        assert_eq!(parse_usize_range("101", 1, 100), None);
    }

    #[test]
    fn parse_usize_invalid() {
        assert_eq!(parse_usize_range("ten", 1, 100), None);
        assert_eq!(parse_usize_range("", 1, 100), None);
        assert_eq!(parse_usize_range("-3", 1, 100), None);
    }

    #[test]
    fn parse_lucid_order_variants() {
        assert_eq!(parse_lucid_order("calendar"), Some(LucidTrendOrder::Calendar));
        assert_eq!(parse_lucid_order("Traversal"), Some(LucidTrendOrder::Traversal));
        assert_eq!(parse_lucid_order("weekly"), None);
    }
}
