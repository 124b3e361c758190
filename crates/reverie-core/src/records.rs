//! Validated journal records.
//!
//! These are the shapes the analytics engine consumes. Every value here has
//! already passed through [`crate::ingest`]: moods are 1–5, clarity is
//! 0–100, intensities are 0–10, and optional strings are never empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Dream record
// ─────────────────────────────────────────────────────────────────────────────

/// One journal entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamRecord {
    /// Record ID, referenced by [`InterpretationRecord::dream_id`].
    pub id: String,
    /// When the dream was logged.
    pub created_at: DateTime<Utc>,
    /// Mood rating, 1–5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<u8>,
    /// Clarity rating, 0–100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarity: Option<u8>,
    /// Dream length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
    /// Whether the dreamer was aware they were dreaming.
    #[serde(default)]
    pub is_lucid: bool,
    /// City the dream was logged in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_city: Option<String>,
    /// Country the dream was logged in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_country: Option<String>,
}

impl DreamRecord {
    /// Create a record with only an ID and timestamp set.
    #[must_use]
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
            mood: None,
            clarity: None,
            duration_secs: None,
            is_lucid: false,
            location_city: None,
            location_country: None,
        }
    }

    /// Set the mood rating.
    #[must_use]
    pub fn with_mood(mut self, mood: u8) -> Self {
        self.mood = Some(mood);
        self
    }

    /// Set the clarity rating.
    #[must_use]
    pub fn with_clarity(mut self, clarity: u8) -> Self {
        self.clarity = Some(clarity);
        self
    }

    /// Set the duration in seconds.
    #[must_use]
    pub fn with_duration_secs(mut self, secs: u64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// Mark the dream as lucid.
    #[must_use]
    pub fn lucid(mut self) -> Self {
        self.is_lucid = true;
        self
    }

    /// Set the location. Pass `None` for either part to leave it unset.
    #[must_use]
    pub fn with_location(mut self, city: Option<&str>, country: Option<&str>) -> Self {
        self.location_city = city.map(str::to_owned);
        self.location_country = country.map(str::to_owned);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Interpretation record
// ─────────────────────────────────────────────────────────────────────────────

/// Emotional tone tagged by the upstream interpretation process.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalTone {
    /// Dominant emotion.
    pub primary: String,
    /// Supporting emotion, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    /// Strength on a 0–10 scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
}

/// Structured annotation attached to a [`DreamRecord`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationRecord {
    /// ID of the annotated dream.
    pub dream_id: String,
    /// Extracted symbols, in extraction order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<String>>,
    /// Emotional tone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotional_tone: Option<EmotionalTone>,
    /// Short topic label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dream_topic: Option<String>,
}

impl InterpretationRecord {
    /// Create an empty interpretation for a dream.
    #[must_use]
    pub fn new(dream_id: impl Into<String>) -> Self {
        Self {
            dream_id: dream_id.into(),
            symbols: None,
            emotional_tone: None,
            dream_topic: None,
        }
    }

    /// Set the symbol list.
    #[must_use]
    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols = Some(symbols.into_iter().map(Into::into).collect());
        self
    }

    /// Set the emotional tone.
    #[must_use]
    pub fn with_tone(
        mut self,
        primary: impl Into<String>,
        secondary: Option<&str>,
        intensity: Option<f64>,
    ) -> Self {
        self.emotional_tone = Some(EmotionalTone {
            primary: primary.into(),
            secondary: secondary.map(str::to_owned),
            intensity,
        });
        self
    }

    /// Set the topic.
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.dream_topic = Some(topic.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
