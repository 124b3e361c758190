//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and implement
//! [`Default`] with the production values. Types marked with
//! `#[serde(default)]` accept partial JSON; missing fields keep their default.

mod analytics;

pub use analytics::*;

use serde::{Deserialize, Serialize};

/// Root settings type for Reverie.
///
/// Loaded from `~/.reverie/settings.json` with defaults applied for
/// missing fields. Environment variables can override specific values.
///
/// # JSON Format
///
/// ```json
/// {
///   "analytics": { "timezone": "Europe/Berlin", "topN": { "symbols": 5 } },
///   "logging": { "level": "info" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReverieSettings {
    /// Aggregation behavior.
    pub analytics: AnalyticsSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl ReverieSettings {
    /// Correct invalid values in place.
    ///
    /// Called automatically during loading. Bad values are replaced with a
    /// warning rather than rejected.
    pub fn validate(&mut self) {
        self.analytics.validate();
        if self.logging.level.trim().is_empty() {
            tracing::warn!("logging level is empty, using default");
            self.logging.level = LoggingSettings::default().level;
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Filter directive for the stderr subscriber (`warn`, `reverie=debug`, ...).
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
