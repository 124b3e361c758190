//! Lucid dream progress.

use indexmap::IndexMap;
use reverie_core::DreamRecord;
use reverie_settings::LucidTrendOrder;

use crate::calendar::{LocalCalendar, MonthKey};
use crate::types::{LucidDreamProgress, LucidMonth};

/// Lucid totals plus the trend over the last `months` month groups.
///
/// With [`LucidTrendOrder::Calendar`] the groups are the most recent calendar
/// months that have records, oldest first. With
/// [`LucidTrendOrder::Traversal`] groups keep the order in which their first
/// record appears in `dreams`, and the last `months` of that order are kept,
/// so the result depends on how the caller ordered its records.
pub fn lucid_progress(
    dreams: &[DreamRecord],
    cal: &LocalCalendar,
    order: LucidTrendOrder,
    months: usize,
) -> LucidDreamProgress {
    let mut groups: IndexMap<MonthKey, (usize, usize)> = IndexMap::new();
    let mut total_lucid = 0;
    for dream in dreams {
        let entry = groups.entry(cal.month(&dream.created_at)).or_default();
        entry.1 += 1;
        if dream.is_lucid {
            entry.0 += 1;
            total_lucid += 1;
        }
    }

    if order == LucidTrendOrder::Calendar {
        groups.sort_keys();
    }

    let skip = groups.len().saturating_sub(months);
    let monthly_trend = groups
        .into_iter()
        .skip(skip)
        .map(|(key, (lucid, total))| LucidMonth {
            month: key.label(),
            lucid,
            total,
        })
        .collect();

    let total_dreams = dreams.len();
    let percentage = if total_dreams == 0 {
        0.0
    } else {
        100.0 * total_lucid as f64 / total_dreams as f64
    };

    LucidDreamProgress {
        total_lucid,
        total_dreams,
        percentage,
        monthly_trend,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn dream(id: &str, y: i32, m: u32) -> DreamRecord {
        DreamRecord::new(id, Utc.with_ymd_and_hms(y, m, 10, 12, 0, 0).unwrap())
    }

    fn labels(p: &LucidDreamProgress) -> Vec<&str> {
        p.monthly_trend.iter().map(|m| m.month.as_str()).collect()
    }

    /// Eight months, fed newest first.
    fn newest_first() -> Vec<DreamRecord> {
        (1..=8).rev().map(|m| dream(&format!("d{m}"), 2026, m)).collect()
    }

    #[test]
    fn empty_input() {
        let p = lucid_progress(&[], &LocalCalendar::default(), LucidTrendOrder::Calendar, 6);
        assert_eq!(p, LucidDreamProgress::default());
    }

    #[test]
    fn totals_and_percentage() {
        let dreams = vec![
            dream("a", 2026, 1).lucid(),
            dream("b", 2026, 1),
            dream("c", 2026, 2),
            dream("d", 2026, 2).lucid(),
        ];
        let p = lucid_progress(&dreams, &LocalCalendar::default(), LucidTrendOrder::Calendar, 6);
        assert_eq!(p.total_lucid, 2);
        assert_eq!(p.total_dreams, 4);
        assert!((p.percentage - 50.0).abs() < f64::EPSILON);
        assert_eq!(
            p.monthly_trend,
            vec![
                LucidMonth {
                    month: "Jan 2026".into(),
                    lucid: 1,
                    total: 2,
                },
                LucidMonth {
                    month: "Feb 2026".into(),
                    lucid: 1,
                    total: 2,
                },
            ]
        );
    }

    #[test]
    fn calendar_order_keeps_most_recent_months() {
        let p = lucid_progress(
            &newest_first(),
            &LocalCalendar::default(),
            LucidTrendOrder::Calendar,
            6,
        );
        assert_eq!(
            labels(&p),
            ["Mar 2026", "Apr 2026", "May 2026", "Jun 2026", "Jul 2026", "Aug 2026"]
        );
    }

    #[test]
    fn traversal_order_keeps_last_groups_seen() {
        let p = lucid_progress(
            &newest_first(),
            &LocalCalendar::default(),
            LucidTrendOrder::Traversal,
            6,
        );
        // Groups appear Aug..Jan, so the last six seen are Jun..Jan.
        assert_eq!(
            labels(&p),
            ["Jun 2026", "May 2026", "Apr 2026", "Mar 2026", "Feb 2026", "Jan 2026"]
        );
    }

    #[test]
    fn orders_agree_on_chronological_input() {
        let mut dreams = newest_first();
        dreams.reverse();
        let cal = LocalCalendar::default();
        let a = lucid_progress(&dreams, &cal, LucidTrendOrder::Calendar, 6);
        let b = lucid_progress(&dreams, &cal, LucidTrendOrder::Traversal, 6);
        assert_eq!(a, b);
    }

    #[test]
    fn calendar_order_spans_years() {
        let dreams = vec![dream("a", 2026, 1), dream("b", 2025, 12), dream("c", 2025, 11)];
        let p = lucid_progress(&dreams, &LocalCalendar::default(), LucidTrendOrder::Calendar, 2);
        assert_eq!(labels(&p), ["Dec 2025", "Jan 2026"]);
    }
}
