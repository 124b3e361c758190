//! Local calendar arithmetic.
//!
//! Every "local" hour, weekday, date and month in the analytics output is
//! taken in one configured IANA timezone.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

/// Hours in a day.
pub const HOURS: usize = 24;
/// Days in a week.
pub const WEEKDAYS: usize = 7;
/// Months in the rolling `dreamsByMonth` window.
pub const MONTH_WINDOW: usize = 12;

/// Weekday names, Sunday first.
pub const DAY_NAMES: [&str; WEEKDAYS] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month. Orders chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
}

impl MonthKey {
    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month before this one.
    #[must_use]
    pub fn pred(self) -> Self {
        if self.month <= 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// `"Mon YYYY"`, e.g. `"Mar 2026"`.
    pub fn label(self) -> String {
        self.to_string()
    }

    /// The `n` months ending at (and including) `self`, oldest first.
    pub fn window_ending(self, n: usize) -> Vec<Self> {
        let mut months = Vec::with_capacity(n);
        let mut cur = self;
        for _ in 0..n {
            months.push(cur);
            cur = cur.pred();
        }
        months.reverse();
        months
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let idx = (self.month.clamp(1, 12) - 1) as usize;
        write!(f, "{} {}", MONTH_ABBR[idx], self.year)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Converts UTC instants to local calendar fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalCalendar {
    tz: Tz,
}

impl Default for LocalCalendar {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl LocalCalendar {
    /// Calendar in `tz`.
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The configured timezone.
    pub fn tz(&self) -> Tz {
        self.tz
    }

    fn local(&self, ts: &DateTime<Utc>) -> DateTime<Tz> {
        ts.with_timezone(&self.tz)
    }

    /// Local hour, 0-23.
    pub fn hour(&self, ts: &DateTime<Utc>) -> usize {
        self.local(ts).hour() as usize
    }

    /// Local weekday index, Sunday = 0.
    pub fn weekday(&self, ts: &DateTime<Utc>) -> usize {
        self.local(ts).weekday().num_days_from_sunday() as usize
    }

    /// Local calendar date.
    pub fn date(&self, ts: &DateTime<Utc>) -> NaiveDate {
        self.local(ts).date_naive()
    }

    /// Local calendar month.
    pub fn month(&self, ts: &DateTime<Utc>) -> MonthKey {
        MonthKey::of(self.date(ts))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
