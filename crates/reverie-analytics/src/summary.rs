//! Scalar summaries: durations, busiest hour and day, streak.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use reverie_core::DreamRecord;

use crate::calendar::{DAY_NAMES, LocalCalendar};
use crate::types::TimeBucket;

/// Total recorded duration in minutes.
pub fn total_dream_time(dreams: &[DreamRecord]) -> f64 {
    total_seconds(dreams) as f64 / 60.0
}

/// Mean duration in seconds over all records, 0 for no records.
pub fn average_dream_length(dreams: &[DreamRecord]) -> f64 {
    if dreams.is_empty() {
        return 0.0;
    }
    total_seconds(dreams) as f64 / dreams.len() as f64
}

fn total_seconds(dreams: &[DreamRecord]) -> u64 {
    dreams
        .iter()
        .filter_map(|d| d.duration_secs)
        .fold(0u64, u64::saturating_add)
}

/// Index of the bucket with the highest count. Ties go to the lowest index.
pub fn busiest(buckets: &[TimeBucket]) -> usize {
    let mut best = 0;
    for (i, bucket) in buckets.iter().enumerate() {
        if bucket.count > buckets[best].count {
            best = i;
        }
    }
    best
}

/// Name of the busiest weekday given Sunday-first buckets.
pub fn busiest_day_name(buckets: &[TimeBucket]) -> String {
    DAY_NAMES
        .get(busiest(buckets))
        .copied()
        .unwrap_or(DAY_NAMES[0])
        .to_owned()
}

/// Consecutive local days with at least one record, ending on the latest
/// such day.
///
/// Returns 0 when the latest day is more than one day before `today`.
pub fn streak_days(dreams: &[DreamRecord], cal: &LocalCalendar, today: NaiveDate) -> u32 {
    let dates: BTreeSet<NaiveDate> = dreams.iter().map(|d| cal.date(&d.created_at)).collect();
    let Some(&last) = dates.last() else {
        return 0;
    };
    if (today - last).num_days() > 1 {
        return 0;
    }

    let mut streak = 0;
    let mut day = Some(last);
    while let Some(d) = day.filter(|d| dates.contains(d)) {
        streak += 1;
        day = d.pred_opt();
    }
    streak
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
