//! Quality metrics: mood trend, clarity distribution and quality score.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use reverie_core::DreamRecord;

use crate::calendar::LocalCalendar;
use crate::types::{ClarityBucket, MoodTrendPoint};

/// Clarity assumed for binning and scoring when a record has none.
pub const DEFAULT_CLARITY: u8 = 50;
/// Mood assumed for scoring when a record has none.
pub const DEFAULT_MOOD: u8 = 3;

/// Inclusive clarity ranges, lowest first.
pub const CLARITY_RANGES: [(u8, u8, &str); 5] = [
    (0, 20, "0-20"),
    (21, 40, "21-40"),
    (41, 60, "41-60"),
    (61, 80, "61-80"),
    (81, 100, "81-100"),
];

/// Average mood per local date, ascending, keeping the most recent `limit`
/// dates. Records without a mood do not contribute.
pub fn mood_trend(
    dreams: &[DreamRecord],
    cal: &LocalCalendar,
    limit: usize,
) -> Vec<MoodTrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, (u64, usize)> = BTreeMap::new();
    for dream in dreams {
        if let Some(mood) = dream.mood {
            let entry = by_date.entry(cal.date(&dream.created_at)).or_default();
            entry.0 += u64::from(mood);
            entry.1 += 1;
        }
    }

    let skip = by_date.len().saturating_sub(limit);
    by_date
        .into_iter()
        .skip(skip)
        .map(|(date, (sum, count))| MoodTrendPoint {
            date,
            avg_mood: sum as f64 / count as f64,
            count,
        })
        .collect()
}

fn clarity_index(clarity: u8) -> usize {
    CLARITY_RANGES
        .iter()
        .position(|&(_, hi, _)| clarity <= hi)
        .unwrap_or(CLARITY_RANGES.len() - 1)
}

/// Record counts over the five clarity ranges.
///
/// Records without clarity are binned as [`DEFAULT_CLARITY`]. Percentages are
/// shares of all records and are all 0 for empty input.
pub fn clarity_distribution(dreams: &[DreamRecord]) -> Vec<ClarityBucket> {
    let mut counts = [0usize; CLARITY_RANGES.len()];
    for dream in dreams {
        counts[clarity_index(dream.clarity.unwrap_or(DEFAULT_CLARITY))] += 1;
    }

    let total = dreams.len();
    CLARITY_RANGES
        .iter()
        .zip(counts)
        .map(|(&(_, _, range), count)| ClarityBucket {
            range,
            count,
            percentage: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            },
        })
        .collect()
}

/// Quality of one record, or `None` when it has neither mood nor clarity.
pub fn record_quality(dream: &DreamRecord) -> Option<f64> {
    if dream.mood.is_none() && dream.clarity.is_none() {
        return None;
    }
    let mood = f64::from(dream.mood.unwrap_or(DEFAULT_MOOD)) / 5.0 * 100.0;
    let clarity = f64::from(dream.clarity.unwrap_or(DEFAULT_CLARITY));
    Some((mood + clarity) / 2.0)
}

/// Mean quality over the records that have mood or clarity, rounded.
pub fn average_quality_score(dreams: &[DreamRecord]) -> u8 {
    let (sum, n) = dreams
        .iter()
        .filter_map(record_quality)
        .fold((0.0, 0usize), |(sum, n), q| (sum + q, n + 1));
    if n == 0 {
        return 0;
    }
    (sum / n as f64).round().clamp(0.0, 100.0) as u8
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    // ── mood_trend ──────────────────────────────────────────────────

    #[test]
    fn mood_trend_groups_by_date() {
        let dreams = vec![
            DreamRecord::new("a", at(2, 1)).with_mood(5),
            DreamRecord::new("b", at(2, 9)).with_mood(3),
            DreamRecord::new("c", at(2, 22)).with_mood(4),
            DreamRecord::new("d", at(1, 4)).with_mood(1),
        ];
        let trend = mood_trend(&dreams, &LocalCalendar::default(), 30);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(trend[1].count, 3);
        assert!(approx_eq(trend[1].avg_mood, 4.0));
    }

    #[test]
    fn mood_trend_skips_records_without_mood() {
        let dreams = vec![
            DreamRecord::new("a", at(3, 1)),
            DreamRecord::new("b", at(4, 1)).with_mood(2),
        ];
        let trend = mood_trend(&dreams, &LocalCalendar::default(), 30);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].count, 1);
    }

    #[test]
    fn mood_trend_keeps_most_recent_dates() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        let dreams: Vec<_> = (0..40)
            .map(|i| DreamRecord::new(format!("d{i}"), start + Duration::days(i)).with_mood(3))
            .collect();
        let trend = mood_trend(&dreams, &LocalCalendar::default(), 30);
        assert_eq!(trend.len(), 30);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2026, 1, 11).unwrap());
        assert_eq!(trend[29].date, NaiveDate::from_ymd_opt(2026, 2, 9).unwrap());
        assert!(trend.windows(2).all(|w| w[0].date < w[1].date));
    }

    // ── clarity_distribution ────────────────────────────────────────

    #[test]
    fn clarity_boundaries() {
        assert_eq!(clarity_index(0), 0);
        assert_eq!(clarity_index(20), 0);
        assert_eq!(clarity_index(21), 1);
        assert_eq!(clarity_index(60), 2);
        assert_eq!(clarity_index(61), 3);
        assert_eq!(clarity_index(100), 4);
        assert_eq!(clarity_index(u8::MAX), 4);
    }

    #[test]
    fn clarity_absent_bins_as_fifty() {
        let dreams = vec![
            DreamRecord::new("a", at(1, 0)),
            DreamRecord::new("b", at(1, 0)).with_clarity(90),
            DreamRecord::new("c", at(1, 0)).with_clarity(10),
            DreamRecord::new("d", at(1, 0)).with_clarity(45),
        ];
        let dist = clarity_distribution(&dreams);
        let counts: Vec<_> = dist.iter().map(|b| b.count).collect();
        assert_eq!(counts, [1, 0, 2, 0, 1]);
        assert!(approx_eq(dist[2].percentage, 50.0));
        assert!(approx_eq(dist[0].percentage, 25.0));
    }

    #[test]
    fn clarity_empty_is_all_zero() {
        let dist = clarity_distribution(&[]);
        let ranges: Vec<_> = dist.iter().map(|b| b.range).collect();
        assert_eq!(ranges, ["0-20", "21-40", "41-60", "61-80", "81-100"]);
        assert!(dist.iter().all(|b| b.count == 0 && b.percentage == 0.0));
    }

    // ── average_quality_score ───────────────────────────────────────

    #[test]
    fn quality_mood_only_uses_default_clarity() {
        let d = DreamRecord::new("a", at(1, 0)).with_mood(5);
        assert_eq!(record_quality(&d), Some(75.0));
        assert_eq!(average_quality_score(&[d]), 75);
    }

    #[test]
    fn quality_clarity_only_uses_default_mood() {
        let d = DreamRecord::new("a", at(1, 0)).with_clarity(80);
        // (60 + 80) / 2
        assert_eq!(record_quality(&d), Some(70.0));
    }

    #[test]
    fn quality_ignores_unscored_records() {
        let dreams = vec![
            DreamRecord::new("a", at(1, 0)).with_mood(1).with_clarity(0),
            DreamRecord::new("b", at(1, 0)),
            DreamRecord::new("c", at(1, 0)).with_mood(4).with_clarity(100),
        ];
        // (10 + 90) / 2
        assert_eq!(average_quality_score(&dreams), 50);
    }

    #[test]
    fn quality_rounds_to_nearest() {
        let dreams = vec![
            DreamRecord::new("a", at(1, 0)).with_clarity(51),
            DreamRecord::new("b", at(1, 0)).with_clarity(50),
        ];
        // qualities 55.5 and 55.0, mean 55.25
        assert_eq!(average_quality_score(&dreams), 55);
        let d = DreamRecord::new("c", at(1, 0)).with_clarity(51);
        // 55.5 rounds away from zero
        assert_eq!(average_quality_score(&[d]), 56);
    }

    #[test]
    fn quality_empty_is_zero() {
        assert_eq!(average_quality_score(&[]), 0);
        assert_eq!(average_quality_score(&[DreamRecord::new("a", at(1, 0))]), 0);
    }
}
