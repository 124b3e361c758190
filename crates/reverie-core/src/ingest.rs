//! Ingestion: permissive wire records in, validated records out.
//!
//! The data-access collaborator hands over camelCase JSON that may contain
//! anything a mobile client ever wrote. One bad record must never abort an
//! aggregation, so every rule here works per record:
//!
//! | Field | Rule |
//! |-------|------|
//! | `createdAt` | RFC 3339 string or epoch milliseconds; otherwise the record is dropped |
//! | `mood` | rounded; outside 1–5 becomes absent |
//! | `clarity` | rounded and clamped to 0–100 |
//! | `duration` | negative or non-finite becomes absent; rounded to whole seconds |
//! | `isLucid` | `true`/`false`, or `1`/`0`; anything else is `false` |
//! | `locationCity`, `locationCountry`, `dreamTopic` | blank or non-string becomes absent |
//! | `symbols` | non-string and blank entries discarded |
//! | `emotionalTone` | non-object or blank `primary` drops the tone; intensity clamped to 0–10 |
//! | `dreamId` | blank drops the interpretation |
//!
//! Numeric fields also accept numeric strings (`"4"`). "Blank" means empty
//! after trimming whitespace. A field holding the wrong JSON type is treated
//! as absent; only a record that is not a JSON object is dropped outright.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::records::{DreamRecord, EmotionalTone, InterpretationRecord};

/// Lowest valid mood rating.
pub const MOOD_MIN: u8 = 1;
/// Highest valid mood rating.
pub const MOOD_MAX: u8 = 5;
/// Highest valid clarity rating.
pub const CLARITY_MAX: u8 = 100;
/// Highest valid emotional intensity.
pub const INTENSITY_MAX: f64 = 10.0;

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

/// A dream record as delivered by the data-access collaborator.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDreamRecord {
    /// Record ID (string or number).
    pub id: Option<Value>,
    /// Timestamp (RFC 3339 string or epoch milliseconds).
    pub created_at: Option<Value>,
    /// Mood rating.
    pub mood: Option<Value>,
    /// Clarity rating.
    pub clarity: Option<Value>,
    /// Duration in seconds.
    pub duration: Option<Value>,
    /// Lucidity flag.
    pub is_lucid: Option<Value>,
    /// City.
    pub location_city: Option<Value>,
    /// Country.
    pub location_country: Option<Value>,
}

/// Emotional tone as delivered on the wire.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEmotionalTone {
    /// Dominant emotion.
    pub primary: Option<Value>,
    /// Supporting emotion.
    pub secondary: Option<Value>,
    /// Strength, nominally 0–10.
    pub intensity: Option<Value>,
}

/// An interpretation record as delivered on the wire.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInterpretationRecord {
    /// ID of the annotated dream (string or number).
    pub dream_id: Option<Value>,
    /// Symbol list; entries may be of any JSON type.
    pub symbols: Option<Value>,
    /// Emotional tone; expected to be an object shaped like [`RawEmotionalTone`].
    pub emotional_tone: Option<Value>,
    /// Topic label.
    pub dream_topic: Option<Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Batch ingestion
// ─────────────────────────────────────────────────────────────────────────────

/// Counters describing what ingestion did to a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records seen.
    pub received: usize,
    /// Records accepted unchanged or after correction.
    pub accepted: usize,
    /// Records accepted with at least one corrected field.
    pub adjusted: usize,
    /// Records rejected.
    pub dropped: usize,
}

/// Validated records plus the report for the batch that produced them.
#[derive(Clone, Debug)]
pub struct Ingested<T> {
    /// Records that survived ingestion, in input order.
    pub records: Vec<T>,
    /// What happened along the way.
    pub report: IngestReport,
}

impl IngestReport {
    fn record(&mut self, accepted: bool, adjusted: bool) {
        if !accepted {
            self.dropped += 1;
            return;
        }
        self.accepted += 1;
        if adjusted {
            self.adjusted += 1;
        }
    }
}

impl<T> Ingested<T> {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            report: IngestReport::default(),
        }
    }
}

/// Ingest a batch of JSON dream records.
pub fn ingest_dreams<I>(values: I) -> Ingested<DreamRecord>
where
    I: IntoIterator<Item = Value>,
{
    let mut out = Ingested::empty();
    for value in values {
        if let Some(record) = ingest_dream(value, &mut out.report) {
            out.records.push(record);
        }
    }
    debug!(report = ?out.report, "dream ingestion complete");
    out
}

/// Ingest one JSON dream record, updating `report`.
pub fn ingest_dream(value: Value, report: &mut IngestReport) -> Option<DreamRecord> {
    report.received += 1;
    let Some(raw) = from_object::<RawDreamRecord>(value, "dream") else {
        report.dropped += 1;
        return None;
    };
    let mut adjusted = false;
    let record = normalize_dream_tracked(raw, &mut adjusted);
    report.record(record.is_some(), adjusted);
    record
}

/// Ingest a batch of JSON interpretation records.
pub fn ingest_interpretations<I>(values: I) -> Ingested<InterpretationRecord>
where
    I: IntoIterator<Item = Value>,
{
    let mut out = Ingested::empty();
    for value in values {
        out.report.received += 1;
        let Some(raw) = from_object::<RawInterpretationRecord>(value, "interpretation") else {
            out.report.dropped += 1;
            continue;
        };
        let mut adjusted = false;
        let record = normalize_interpretation_tracked(raw, &mut adjusted);
        out.report.record(record.is_some(), adjusted);
        out.records.extend(record);
    }
    debug!(report = ?out.report, "interpretation ingestion complete");
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-record normalization
// ─────────────────────────────────────────────────────────────────────────────

/// Validate a single dream record. Returns `None` when it must be dropped.
pub fn normalize_dream(raw: RawDreamRecord) -> Option<DreamRecord> {
    normalize_dream_tracked(raw, &mut false)
}

/// Validate a single interpretation record. Returns `None` when it must be dropped.
pub fn normalize_interpretation(raw: RawInterpretationRecord) -> Option<InterpretationRecord> {
    normalize_interpretation_tracked(raw, &mut false)
}

fn normalize_dream_tracked(raw: RawDreamRecord, adjusted: &mut bool) -> Option<DreamRecord> {
    let id = raw.id.as_ref().and_then(id_string).unwrap_or_default();

    let Some(created_at) = raw.created_at.as_ref().and_then(parse_timestamp) else {
        warn!(
            dream_id = %id,
            created_at = ?raw.created_at,
            "unparseable timestamp, dropping dream"
        );
        return None;
    };

    let mood = raw.mood.as_ref().and_then(|v| {
        let Some(n) = number(v) else {
            warn!(dream_id = %id, value = %v, "non-numeric mood, treating as absent");
            *adjusted = true;
            return None;
        };
        let rounded = n.round();
        if rounded < f64::from(MOOD_MIN) || rounded > f64::from(MOOD_MAX) {
            warn!(dream_id = %id, mood = n, "mood out of range, treating as absent");
            *adjusted = true;
            return None;
        }
        Some(rounded as u8)
    });

    let clarity = raw.clarity.as_ref().and_then(|v| {
        let Some(n) = number(v) else {
            warn!(dream_id = %id, value = %v, "non-numeric clarity, treating as absent");
            *adjusted = true;
            return None;
        };
        let clamped = n.round().clamp(0.0, f64::from(CLARITY_MAX));
        if (clamped - n).abs() >= 0.5 {
            warn!(dream_id = %id, clarity = n, clamped, "clarity out of range, clamped");
            *adjusted = true;
        }
        Some(clamped as u8)
    });

    let duration_secs = raw.duration.as_ref().and_then(|v| match number(v) {
        Some(n) if n >= 0.0 => Some(n.round() as u64),
        _ => {
            warn!(dream_id = %id, value = %v, "invalid duration, treating as absent");
            *adjusted = true;
            None
        }
    });

    let is_lucid = match raw.is_lucid {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(ref v) => match v.as_i64() {
            Some(0) => false,
            Some(1) => true,
            _ => {
                warn!(dream_id = %id, value = %v, "invalid isLucid flag, treating as false");
                *adjusted = true;
                false
            }
        },
    };

    let location_city = string_field(raw.location_city, "locationCity", &id, adjusted);
    let location_country = string_field(raw.location_country, "locationCountry", &id, adjusted);

    Some(DreamRecord {
        id,
        created_at,
        mood,
        clarity,
        duration_secs,
        is_lucid,
        location_city,
        location_country,
    })
}

fn normalize_interpretation_tracked(
    raw: RawInterpretationRecord,
    adjusted: &mut bool,
) -> Option<InterpretationRecord> {
    let Some(dream_id) = raw.dream_id.as_ref().and_then(id_string) else {
        warn!("interpretation without dreamId, dropping");
        return None;
    };

    let symbols = raw.symbols.and_then(|value| match value {
        Value::Array(items) => {
            let total = items.len();
            let kept: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.trim().is_empty() => Some(s),
                    _ => None,
                })
                .collect();
            if kept.len() != total {
                debug!(
                    dream_id = %dream_id,
                    discarded = total - kept.len(),
                    "discarded invalid symbols"
                );
                *adjusted = true;
            }
            Some(kept)
        }
        Value::Null => None,
        other => {
            warn!(dream_id = %dream_id, value = %other, "symbols is not an array, ignoring");
            *adjusted = true;
            None
        }
    });

    let emotional_tone = raw.emotional_tone.and_then(|value| {
        let tone = match value {
            Value::Null => return None,
            Value::Object(map) => {
                serde_json::from_value::<RawEmotionalTone>(Value::Object(map)).ok()?
            }
            other => {
                warn!(
                    dream_id = %dream_id,
                    value = %other,
                    "emotionalTone is not an object, ignoring"
                );
                *adjusted = true;
                return None;
            }
        };
        let Some(primary) = string_field(tone.primary, "primary", &dream_id, adjusted) else {
            warn!(dream_id = %dream_id, "emotional tone without primary emotion, ignoring");
            *adjusted = true;
            return None;
        };
        let intensity = tone.intensity.as_ref().and_then(|v| {
            let Some(n) = number(v) else {
                warn!(dream_id = %dream_id, value = %v, "non-numeric intensity, using default");
                *adjusted = true;
                return None;
            };
            let clamped = n.clamp(0.0, INTENSITY_MAX);
            if clamped != n {
                warn!(
                    dream_id = %dream_id,
                    intensity = n,
                    clamped,
                    "intensity out of range, clamped"
                );
                *adjusted = true;
            }
            Some(clamped)
        });
        Some(EmotionalTone {
            primary,
            secondary: string_field(tone.secondary, "secondary", &dream_id, adjusted),
            intensity,
        })
    });
    let dream_topic = string_field(raw.dream_topic, "dreamTopic", &dream_id, adjusted);

    Some(InterpretationRecord {
        dream_id,
        symbols,
        emotional_tone,
        dream_topic,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Value helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a timestamp from an RFC 3339 string or integer epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

/// Finite number from a JSON number or numeric string.
fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Deserialize a wire record, dropping anything that is not a JSON object.
fn from_object<T: DeserializeOwned>(value: Value, kind: &str) -> Option<T> {
    if !value.is_object() {
        warn!(kind, value = %value, "record is not a JSON object, dropping");
        return None;
    }
    match serde_json::from_value(value) {
        Ok(raw) => Some(raw),
        Err(e) => {
            warn!(kind, error = %e, "malformed record, dropping");
            None
        }
    }
}

/// Optional text field. Blank strings are absent; other JSON types are
/// absent and flag the record as adjusted.
fn string_field(
    value: Option<Value>,
    field: &str,
    dream_id: &str,
    adjusted: &mut bool,
) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => (!s.trim().is_empty()).then_some(s),
        other => {
            warn!(
                dream_id = %dream_id,
                field,
                value = %other,
                "non-string field, treating as absent"
            );
            *adjusted = true;
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
