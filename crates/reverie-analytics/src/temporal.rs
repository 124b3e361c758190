//! Temporal binning: records by local hour, weekday and month.
//!
//! Each dimension is accumulated into a keyed map first and then
//! materialized into a fixed-size vector, so empty keys come out zero-filled.

use std::collections::{BTreeMap, HashMap};

use reverie_core::DreamRecord;

use crate::calendar::{HOURS, LocalCalendar, MONTH_WINDOW, MonthKey, WEEKDAYS};
use crate::types::{MonthBucket, TimeBucket};

/// Count plus running mood statistics for one bucket.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct MoodTally {
    count: usize,
    mood_sum: u64,
    mood_count: usize,
}

impl MoodTally {
    pub(crate) fn add(&mut self, dream: &DreamRecord) {
        self.count += 1;
        if let Some(mood) = dream.mood {
            self.mood_sum += u64::from(mood);
            self.mood_count += 1;
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn avg_mood(&self) -> Option<f64> {
        (self.mood_count > 0).then(|| self.mood_sum as f64 / self.mood_count as f64)
    }

    fn bucket(self) -> TimeBucket {
        TimeBucket {
            count: self.count,
            avg_mood: self.avg_mood(),
        }
    }
}

/// Output of the temporal stage.
#[derive(Clone, Debug, PartialEq)]
pub struct TemporalBins {
    /// 24 hour buckets.
    pub by_hour: Vec<TimeBucket>,
    /// 7 weekday buckets, Sunday first.
    pub by_day_of_week: Vec<TimeBucket>,
    /// 12 month buckets ending at the current month.
    pub by_month: Vec<MonthBucket>,
}

fn materialize(map: &BTreeMap<usize, MoodTally>, size: usize) -> Vec<TimeBucket> {
    (0..size)
        .map(|k| map.get(&k).copied().unwrap_or_default().bucket())
        .collect()
}

/// Bin `dreams` by local hour, weekday and month.
///
/// `current` is the last month of the rolling window; records outside the
/// window are not counted in `by_month`.
pub fn bin_temporal(
    dreams: &[DreamRecord],
    cal: &LocalCalendar,
    current: MonthKey,
) -> TemporalBins {
    let mut hours: BTreeMap<usize, MoodTally> = BTreeMap::new();
    let mut days: BTreeMap<usize, MoodTally> = BTreeMap::new();
    let mut months: HashMap<MonthKey, usize> = HashMap::new();

    for dream in dreams {
        hours.entry(cal.hour(&dream.created_at)).or_default().add(dream);
        days.entry(cal.weekday(&dream.created_at)).or_default().add(dream);
        *months.entry(cal.month(&dream.created_at)).or_default() += 1;
    }

    let by_month = current
        .window_ending(MONTH_WINDOW)
        .into_iter()
        .map(|key| MonthBucket::new(key, months.get(&key).copied().unwrap_or(0)))
        .collect();

    TemporalBins {
        by_hour: materialize(&hours, HOURS),
        by_day_of_week: materialize(&days, WEEKDAYS),
        by_month,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
