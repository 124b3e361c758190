//! # reverie-analytics
//!
//! Dream analytics aggregation engine.
//!
//! Turns a user's dream records and their interpretations into one
//! [`DreamAnalytics`] aggregate. Each stage lives in its own module and is a
//! free function over the record slices:
//!
//! - [`temporal`]: counts and mood by local hour, weekday and month
//! - [`quality`]: mood trend, clarity distribution, quality score
//! - [`lucid`]: lucid totals and monthly trend
//! - [`content`]: symbol, emotion and topic rankings
//! - [`location`]: per-location counts and mood
//! - [`summary`]: durations, busiest hour and day, streak
//!
//! [`AnalyticsEngine`] runs them all; [`AnalyticsCache`] memoizes its output.

#![deny(unsafe_code)]

pub mod cache;
pub mod calendar;
pub mod content;
pub mod engine;
pub mod location;
pub mod lucid;
pub mod quality;
pub mod summary;
pub mod temporal;
pub mod types;

pub use cache::AnalyticsCache;
pub use calendar::{LocalCalendar, MonthKey};
pub use engine::{AnalyticsEngine, AnalyticsOptions};
pub use types::*;
