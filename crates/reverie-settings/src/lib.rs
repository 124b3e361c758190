//! # reverie-settings
//!
//! Configuration management with layered sources for Reverie.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`ReverieSettings::default()`]
//! 2. **User file**: `~/.reverie/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `REVERIE_*` overrides (highest priority)
//!
//! Out-of-range values are corrected by [`ReverieSettings::validate`] with a
//! warning rather than rejected.
//!
//! # Usage
//!
//! ```no_run
//! use reverie_settings::load_settings;
//!
//! let settings = load_settings().unwrap_or_default();
//! println!("timezone: {}", settings.analytics.timezone);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
