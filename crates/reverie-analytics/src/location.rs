//! Location stats.

use std::collections::HashMap;

use reverie_core::DreamRecord;

use crate::temporal::MoodTally;
use crate::types::LocationStat;

fn present(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Grouping key: `"City, Country"`, the city alone, the country alone, or
/// `None` when the record has no location.
pub fn location_key(dream: &DreamRecord) -> Option<String> {
    let city = present(dream.location_city.as_deref());
    let country = present(dream.location_country.as_deref());
    match (city, country) {
        (Some(city), Some(country)) => Some(format!("{city}, {country}")),
        (Some(city), None) => Some(city.to_owned()),
        (None, Some(country)) => Some(country.to_owned()),
        (None, None) => None,
    }
}

/// The `n` locations with the most records.
///
/// Records without a location are left out. Equal counts are ordered by
/// location name.
pub fn location_stats(dreams: &[DreamRecord], n: usize) -> Vec<LocationStat> {
    let mut groups: HashMap<String, MoodTally> = HashMap::new();
    for dream in dreams {
        if let Some(key) = location_key(dream) {
            groups.entry(key).or_default().add(dream);
        }
    }

    let mut stats: Vec<LocationStat> = groups
        .into_iter()
        .map(|(location, tally)| LocationStat {
            location,
            count: tally.count(),
            avg_mood: tally.avg_mood(),
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.location.cmp(&b.location)));
    stats.truncate(n);
    stats
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(city: Option<&str>, country: Option<&str>) -> DreamRecord {
        DreamRecord::new("d", Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
            .with_location(city, country)
    }

    #[test]
    fn key_formats() {
        assert_eq!(
            location_key(&at(Some("Lisbon"), Some("Portugal"))).as_deref(),
            Some("Lisbon, Portugal")
        );
        assert_eq!(location_key(&at(None, Some("Japan"))).as_deref(), Some("Japan"));
        assert_eq!(location_key(&at(Some("Oslo"), None)).as_deref(), Some("Oslo"));
        assert_eq!(location_key(&at(None, None)), None);
        assert_eq!(location_key(&at(Some(" "), Some(""))), None);
    }

    #[test]
    fn records_without_location_are_excluded() {
        let dreams = vec![at(None, None), at(None, None), at(None, Some("Peru"))];
        let stats = location_stats(&dreams, 10);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].location, "Peru");
        assert_eq!(stats[0].count, 1);
    }

    #[test]
    fn counts_and_average_mood() {
        let dreams = vec![
            at(Some("Rome"), Some("Italy")).with_mood(5),
            at(Some("Rome"), Some("Italy")).with_mood(2),
            at(Some("Rome"), Some("Italy")),
            at(None, Some("Italy")),
        ];
        let stats = location_stats(&dreams, 10);
        assert_eq!(stats[0].location, "Rome, Italy");
        assert_eq!(stats[0].count, 3);
        assert_eq!(stats[0].avg_mood, Some(3.5));
        assert_eq!(stats[1].location, "Italy");
        assert_eq!(stats[1].avg_mood, None);
    }

    #[test]
    fn ties_sorted_by_name_and_truncated() {
        let dreams = vec![
            at(None, Some("Chile")),
            at(None, Some("Austria")),
            at(None, Some("Brazil")),
        ];
        let names: Vec<_> = location_stats(&dreams, 2)
            .into_iter()
            .map(|s| s.location)
            .collect();
        assert_eq!(names, ["Austria", "Brazil"]);
    }
}
