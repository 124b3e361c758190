//! The `DreamAnalytics` aggregate and its bucket types.
//!
//! All types serialize camelCase. Optional averages are omitted from JSON
//! when no value contributed to them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::MonthKey;

/// One hour-of-day or day-of-week bucket.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBucket {
    /// Records in the bucket.
    pub count: usize,
    /// Mean of the defined moods; absent when none were defined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_mood: Option<f64>,
}

/// One month of the rolling twelve-month window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    /// `"Mon YYYY"`.
    pub label: String,
    /// Calendar year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
    /// Records in the month.
    pub count: usize,
}

impl MonthBucket {
    pub(crate) fn new(key: MonthKey, count: usize) -> Self {
        Self {
            label: key.label(),
            year: key.year,
            month: key.month,
            count,
        }
    }
}

/// Average mood on one local date.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodTrendPoint {
    /// Local calendar date (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Mean mood of the records on that date.
    pub avg_mood: f64,
    /// Mood values that contributed.
    pub count: usize,
}

/// One clarity range.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarityBucket {
    /// Inclusive range label, e.g. `"41-60"`.
    pub range: &'static str,
    /// Records in the range.
    pub count: usize,
    /// Share of all records, 0-100.
    pub percentage: f64,
}

/// Lucid counts for one month group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LucidMonth {
    /// `"Mon YYYY"`.
    pub month: String,
    /// Lucid records in the month.
    pub lucid: usize,
    /// All records in the month.
    pub total: usize,
}

/// Lucid dream totals and recent monthly trend.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LucidDreamProgress {
    /// Records flagged lucid.
    pub total_lucid: usize,
    /// All records.
    pub total_dreams: usize,
    /// `100 * total_lucid / total_dreams`, 0 with no records.
    pub percentage: f64,
    /// Recent month groups.
    pub monthly_trend: Vec<LucidMonth>,
}

/// A symbol and its occurrence count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SymbolCount {
    /// Symbol text, exactly as tagged.
    pub symbol: String,
    /// Occurrences across all interpretations.
    pub count: usize,
}

/// An emotion with its weighted intensity.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionStat {
    /// Emotion name.
    pub emotion: String,
    /// Times it appeared as primary or secondary tone.
    pub count: usize,
    /// Accumulated intensity divided by `count`.
    pub avg_intensity: f64,
}

/// A topic and its occurrence count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    /// Topic text.
    pub topic: String,
    /// Interpretations tagged with it.
    pub count: usize,
}

/// Records grouped by location.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStat {
    /// `"City, Country"`, or the country alone.
    pub location: String,
    /// Records at the location.
    pub count: usize,
    /// Mean of the defined moods; absent when none were defined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_mood: Option<f64>,
}

/// The complete analytics aggregate for one user.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamAnalytics {
    /// 24 buckets by local hour.
    pub dreams_by_hour: Vec<TimeBucket>,
    /// 7 buckets by local weekday, Sunday first.
    pub dreams_by_day_of_week: Vec<TimeBucket>,
    /// The 12 months ending at the current month, oldest first.
    pub dreams_by_month: Vec<MonthBucket>,
    /// Average mood per local date, ascending.
    pub mood_trend: Vec<MoodTrendPoint>,
    /// Five clarity ranges.
    pub clarity_distribution: Vec<ClarityBucket>,
    /// Combined mood and clarity score, 0-100.
    pub average_quality_score: u8,
    /// Lucid totals and trend.
    pub lucid_dream_progress: LucidDreamProgress,
    /// Most frequent symbols.
    pub top_symbols: Vec<SymbolCount>,
    /// Most frequent emotions.
    pub emotional_tones: Vec<EmotionStat>,
    /// Most frequent topics.
    pub dream_topics: Vec<TopicCount>,
    /// Most frequent locations.
    pub location_stats: Vec<LocationStat>,
    /// Total recorded duration in minutes.
    pub total_dream_time: f64,
    /// Mean duration in seconds over all records.
    pub average_dream_length: f64,
    /// Local hour with the most records.
    pub most_productive_hour: usize,
    /// Weekday name with the most records.
    pub most_productive_day: String,
    /// Consecutive active days ending today or yesterday.
    pub streak_days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_avg_mood_is_omitted() {
        let json = serde_json::to_value(TimeBucket::default()).unwrap();
        assert_eq!(json, serde_json::json!({"count": 0}));

        let json = serde_json::to_value(TimeBucket {
            count: 2,
            avg_mood: Some(3.5),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"count": 2, "avgMood": 3.5}));
    }

    #[test]
    fn month_bucket_shape() {
        let bucket = MonthBucket::new(MonthKey { year: 2026, month: 2 }, 4);
        insta::assert_json_snapshot!(bucket, @r#"
        {
          "label": "Feb 2026",
          "year": 2026,
          "month": 2,
          "count": 4
        }
        "#);
    }

    #[test]
    fn mood_trend_date_is_iso() {
        let point = MoodTrendPoint {
            date: NaiveDate::from_ymd_opt(2026, 5, 9).unwrap(),
            avg_mood: 4.0,
            count: 1,
        };
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["date"], "2026-05-09");
        assert_eq!(json["avgMood"], 4.0);
    }
}
