//! Analytics engine settings.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Default number of trailing mood-trend dates.
pub const DEFAULT_MOOD_TREND_DAYS: usize = 30;
/// Default number of trailing lucid-trend months.
pub const DEFAULT_LUCID_TREND_MONTHS: usize = 6;
/// Default length of each ranked list.
pub const DEFAULT_TOP_N: usize = 10;

/// How the lucid trend picks its trailing months.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LucidTrendOrder {
    /// Most recent calendar months, oldest first.
    #[default]
    Calendar,
    /// Last months in first-occurrence order over the input sequence.
    Traversal,
}

/// Aggregation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSettings {
    /// IANA timezone that defines "local" hours, days and months.
    pub timezone: String,
    /// Dates kept in the mood trend.
    pub mood_trend_days: usize,
    /// Months kept in the lucid trend.
    pub lucid_trend_months: usize,
    /// Month selection for the lucid trend.
    pub lucid_trend_order: LucidTrendOrder,
    /// Ranked list lengths.
    pub top_n: TopNSettings,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            mood_trend_days: DEFAULT_MOOD_TREND_DAYS,
            lucid_trend_months: DEFAULT_LUCID_TREND_MONTHS,
            lucid_trend_order: LucidTrendOrder::default(),
            top_n: TopNSettings::default(),
        }
    }
}

impl AnalyticsSettings {
    /// Parsed timezone, falling back to UTC when the name is unknown.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(Tz::UTC)
    }

    pub(crate) fn validate(&mut self) {
        if self.timezone.parse::<Tz>().is_err() {
            tracing::warn!(timezone = %self.timezone, "unknown timezone, using UTC");
            self.timezone = "UTC".to_string();
        }
        replace_zero(&mut self.mood_trend_days, DEFAULT_MOOD_TREND_DAYS, "mood_trend_days");
        replace_zero(
            &mut self.lucid_trend_months,
            DEFAULT_LUCID_TREND_MONTHS,
            "lucid_trend_months",
        );
        let top = &mut self.top_n;
        replace_zero(&mut top.symbols, DEFAULT_TOP_N, "top_n.symbols");
        replace_zero(&mut top.emotions, DEFAULT_TOP_N, "top_n.emotions");
        replace_zero(&mut top.topics, DEFAULT_TOP_N, "top_n.topics");
        replace_zero(&mut top.locations, DEFAULT_TOP_N, "top_n.locations");
    }
}

fn replace_zero(val: &mut usize, default: usize, name: &str) {
    if *val == 0 {
        tracing::warn!("{name} is 0, using default {default}");
        *val = default;
    }
}

/// Lengths of the ranked frequency lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopNSettings {
    /// Most frequent symbols.
    pub symbols: usize,
    /// Most frequent primary emotions.
    pub emotions: usize,
    /// Most frequent topics.
    pub topics: usize,
    /// Most frequent locations.
    pub locations: usize,
}

impl Default for TopNSettings {
    fn default() -> Self {
        Self::uniform(DEFAULT_TOP_N)
    }
}

impl TopNSettings {
    /// Same length for every list.
    pub fn uniform(n: usize) -> Self {
        Self {
            symbols: n,
            emotions: n,
            topics: n,
            locations: n,
        }
    }
}
