//! The aggregation engine.
//!
//! [`AnalyticsEngine`] holds only immutable options. Each call runs every
//! stage over the same two record slices and assembles one
//! [`DreamAnalytics`]. It never fails and never returns a partial aggregate.

use std::borrow::Cow;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use reverie_core::{DreamRecord, InterpretationRecord};
use reverie_settings::{AnalyticsSettings, LucidTrendOrder, TopNSettings};
use tracing::{debug, instrument};

use crate::calendar::{LocalCalendar, MonthKey};
use crate::content::{dream_topics, emotional_tones, top_symbols};
use crate::location::location_stats;
use crate::lucid::lucid_progress;
use crate::quality::{average_quality_score, clarity_distribution, mood_trend};
use crate::summary::{
    average_dream_length, busiest, busiest_day_name, streak_days, total_dream_time,
};
use crate::temporal::bin_temporal;
use crate::types::DreamAnalytics;

/// Tunables for an [`AnalyticsEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalyticsOptions {
    /// Timezone that defines local hours, dates and months.
    pub timezone: Tz,
    /// Dates kept in the mood trend.
    pub mood_trend_days: usize,
    /// Month groups kept in the lucid trend.
    pub lucid_trend_months: usize,
    /// How lucid month groups are ordered before truncation.
    pub lucid_trend_order: LucidTrendOrder,
    /// Ranked list lengths.
    pub top_n: TopNSettings,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self::from(&AnalyticsSettings::default())
    }
}

impl From<&AnalyticsSettings> for AnalyticsOptions {
    fn from(settings: &AnalyticsSettings) -> Self {
        Self {
            timezone: settings.tz(),
            mood_trend_days: settings.mood_trend_days,
            lucid_trend_months: settings.lucid_trend_months,
            lucid_trend_order: settings.lucid_trend_order,
            top_n: settings.top_n,
        }
    }
}

/// Stateless dream analytics calculator.
#[derive(Clone, Debug, Default)]
pub struct AnalyticsEngine {
    options: AnalyticsOptions,
}

impl AnalyticsEngine {
    /// Create an engine with explicit options.
    pub fn new(options: AnalyticsOptions) -> Self {
        Self { options }
    }

    /// Create an engine from loaded settings.
    pub fn from_settings(settings: &AnalyticsSettings) -> Self {
        Self::new(AnalyticsOptions::from(settings))
    }

    /// The engine's options.
    pub fn options(&self) -> &AnalyticsOptions {
        &self.options
    }

    /// Local calendar used for every date-dependent field.
    pub fn calendar(&self) -> LocalCalendar {
        LocalCalendar::new(self.options.timezone)
    }

    /// Compute analytics as of the current instant.
    pub fn compute(
        &self,
        dreams: &[DreamRecord],
        interpretations: &[InterpretationRecord],
    ) -> DreamAnalytics {
        self.compute_at(dreams, interpretations, Utc::now())
    }

    /// Compute analytics as of `now`.
    ///
    /// `now` fixes the last month of `dreamsByMonth` and the day the streak
    /// is measured against. Interpretations whose `dream_id` matches no
    /// record in `dreams` are ignored.
    #[instrument(skip_all, fields(dreams = dreams.len(), interpretations = interpretations.len()))]
    pub fn compute_at(
        &self,
        dreams: &[DreamRecord],
        interpretations: &[InterpretationRecord],
        now: DateTime<Utc>,
    ) -> DreamAnalytics {
        let opts = &self.options;
        let cal = self.calendar();
        let today = cal.date(&now);
        let interpretations = attached(dreams, interpretations);

        let temporal = bin_temporal(dreams, &cal, MonthKey::of(today));
        let mood_trend = mood_trend(dreams, &cal, opts.mood_trend_days);
        let clarity_distribution = clarity_distribution(dreams);
        let average_quality_score = average_quality_score(dreams);
        debug!(
            mood_dates = mood_trend.len(),
            average_quality_score, "temporal and quality stages done"
        );

        let lucid_dream_progress =
            lucid_progress(dreams, &cal, opts.lucid_trend_order, opts.lucid_trend_months);
        debug!(
            total_lucid = lucid_dream_progress.total_lucid,
            months = lucid_dream_progress.monthly_trend.len(),
            "lucid stage done"
        );

        let top_symbols = top_symbols(&interpretations, opts.top_n.symbols);
        let emotional_tones = emotional_tones(&interpretations, opts.top_n.emotions);
        let dream_topics = dream_topics(&interpretations, opts.top_n.topics);
        let location_stats = location_stats(dreams, opts.top_n.locations);
        debug!(
            symbols = top_symbols.len(),
            emotions = emotional_tones.len(),
            topics = dream_topics.len(),
            locations = location_stats.len(),
            "content and location stages done"
        );

        let most_productive_hour = busiest(&temporal.by_hour);
        let most_productive_day = busiest_day_name(&temporal.by_day_of_week);
        let streak_days = streak_days(dreams, &cal, today);
        debug!(streak_days, %today, "summary stage done");

        DreamAnalytics {
            dreams_by_hour: temporal.by_hour,
            dreams_by_day_of_week: temporal.by_day_of_week,
            dreams_by_month: temporal.by_month,
            mood_trend,
            clarity_distribution,
            average_quality_score,
            lucid_dream_progress,
            top_symbols,
            emotional_tones,
            dream_topics,
            location_stats,
            total_dream_time: total_dream_time(dreams),
            average_dream_length: average_dream_length(dreams),
            most_productive_hour,
            most_productive_day,
            streak_days,
        }
    }
}

/// Interpretations whose dream is present in `dreams`.
fn attached<'a>(
    dreams: &[DreamRecord],
    interpretations: &'a [InterpretationRecord],
) -> Cow<'a, [InterpretationRecord]> {
    let ids: HashSet<&str> = dreams.iter().map(|d| d.id.as_str()).collect();
    let orphans = interpretations
        .iter()
        .filter(|i| !ids.contains(i.dream_id.as_str()))
        .count();
    if orphans == 0 {
        return Cow::Borrowed(interpretations);
    }
    debug!(orphans, "ignoring interpretations without a matching dream");
    Cow::Owned(
        interpretations
            .iter()
            .filter(|i| ids.contains(i.dream_id.as_str()))
            .cloned()
            .collect(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
