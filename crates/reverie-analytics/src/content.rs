//! Content extraction over already-tagged interpretation fields.
//!
//! Ranked lists are sorted by count descending. The sort is stable over
//! first-seen order, so equal counts keep the order their keys first
//! appeared in the input.
//!
//! Symbols and topics that are empty or whitespace-only are not counted,
//! matching what ingestion already discards.

use indexmap::IndexMap;
use reverie_core::InterpretationRecord;

use crate::types::{EmotionStat, SymbolCount, TopicCount};

/// Intensity assumed when a tone carries none.
pub const DEFAULT_INTENSITY: f64 = 5.0;

fn non_blank(s: &str) -> Option<&str> {
    (!s.trim().is_empty()).then_some(s)
}

fn rank<V>(map: IndexMap<&str, V>, count: impl Fn(&V) -> usize, n: usize) -> Vec<(&str, V)> {
    let mut ranked: Vec<_> = map.into_iter().collect();
    ranked.sort_by(|a, b| count(&b.1).cmp(&count(&a.1)));
    ranked.truncate(n);
    ranked
}

/// The `n` most frequent symbols across all interpretations.
pub fn top_symbols(interpretations: &[InterpretationRecord], n: usize) -> Vec<SymbolCount> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    let symbols = interpretations
        .iter()
        .filter_map(|i| i.symbols.as_deref())
        .flatten()
        .filter_map(|s| non_blank(s));
    for symbol in symbols {
        *counts.entry(symbol).or_default() += 1;
    }

    rank(counts, |c| *c, n)
        .into_iter()
        .map(|(symbol, count)| SymbolCount {
            symbol: symbol.to_owned(),
            count,
        })
        .collect()
}

#[derive(Default)]
struct ToneTally {
    count: usize,
    intensity: f64,
}

/// The `n` most frequent emotions.
///
/// A primary tone adds one to its count and its full intensity to its total.
/// A secondary tone also adds one to its count but only half the intensity.
pub fn emotional_tones(interpretations: &[InterpretationRecord], n: usize) -> Vec<EmotionStat> {
    let mut tallies: IndexMap<&str, ToneTally> = IndexMap::new();
    for tone in interpretations.iter().filter_map(|i| i.emotional_tone.as_ref()) {
        let Some(primary) = non_blank(&tone.primary) else {
            continue;
        };
        let intensity = tone.intensity.unwrap_or(DEFAULT_INTENSITY);

        let entry = tallies.entry(primary).or_default();
        entry.count += 1;
        entry.intensity += intensity;

        if let Some(secondary) = tone.secondary.as_deref().and_then(non_blank) {
            let entry = tallies.entry(secondary).or_default();
            entry.count += 1;
            entry.intensity += intensity / 2.0;
        }
    }

    rank(tallies, |t| t.count, n)
        .into_iter()
        .map(|(emotion, t)| EmotionStat {
            emotion: emotion.to_owned(),
            count: t.count,
            avg_intensity: t.intensity / t.count as f64,
        })
        .collect()
}

/// The `n` most frequent topics.
pub fn dream_topics(interpretations: &[InterpretationRecord], n: usize) -> Vec<TopicCount> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for topic in interpretations
        .iter()
        .filter_map(|i| i.dream_topic.as_deref().and_then(non_blank))
    {
        *counts.entry(topic).or_default() += 1;
    }

    rank(counts, |c| *c, n)
        .into_iter()
        .map(|(topic, count)| TopicCount {
            topic: topic.to_owned(),
            count,
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn interp(id: &str) -> InterpretationRecord {
        InterpretationRecord::new(id)
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ── top_symbols ─────────────────────────────────────────────────

    #[test]
    fn symbols_ranked_by_count() {
        let interps = vec![
            interp("a").with_symbols(["flying", "water"]),
            interp("b").with_symbols(["flying"]),
        ];
        insta::assert_json_snapshot!(top_symbols(&interps, 10), @r#"
        [
          {
            "symbol": "flying",
            "count": 2
          },
          {
            "symbol": "water",
            "count": 1
          }
        ]
        "#);
    }

    #[test]
    fn symbols_ties_keep_first_seen_order() {
        let interps = vec![
            interp("a").with_symbols(["moon", "door", "key"]),
            interp("b").with_symbols(["key", "door"]),
        ];
        let names: Vec<_> = top_symbols(&interps, 10)
            .into_iter()
            .map(|s| s.symbol)
            .collect();
        assert_eq!(names, ["door", "key", "moon"]);
    }

    #[test]
    fn symbols_are_exact_match_and_skip_blanks() {
        let interps = vec![
            interp("a").with_symbols(["Water", "water", "", "  "]),
            interp("b"),
        ];
        let top = top_symbols(&interps, 10);
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|s| s.count == 1));
    }

    #[test]
    fn symbols_truncate_to_n() {
        let symbols: Vec<String> = (0..15).map(|i| format!("s{i}")).collect();
        let interps = vec![interp("a").with_symbols(symbols)];
        let top = top_symbols(&interps, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[9].symbol, "s9");
    }

    // ── emotional_tones ─────────────────────────────────────────────

    #[test]
    fn secondary_tone_gets_half_intensity() {
        let interps = vec![interp("a").with_tone("fear", Some("awe"), Some(8.0))];
        let tones = emotional_tones(&interps, 10);
        assert_eq!(tones.len(), 2);
        assert_eq!(tones[0].emotion, "fear");
        assert_eq!(tones[0].count, 1);
        assert!(approx_eq(tones[0].avg_intensity, 8.0));
        assert_eq!(tones[1].emotion, "awe");
        assert_eq!(tones[1].count, 1);
        assert!(approx_eq(tones[1].avg_intensity, 4.0));
    }

    #[test]
    fn missing_intensity_defaults_to_five() {
        let interps = vec![
            interp("a").with_tone("joy", None, None),
            interp("b").with_tone("calm", Some("joy"), Some(2.0)),
        ];
        let tones = emotional_tones(&interps, 10);
        let joy = tones.iter().find(|t| t.emotion == "joy").unwrap();
        assert_eq!(joy.count, 2);
        // (5 + 2/2) / 2
        assert!(approx_eq(joy.avg_intensity, 3.0));
        assert_eq!(tones[0].emotion, "joy");
    }

    #[test]
    fn secondary_weighting_changes_ranking_input() {
        // "anxiety" only appears as a secondary but its count still outranks.
        let interps = vec![
            interp("a").with_tone("joy", Some("anxiety"), Some(10.0)),
            interp("b").with_tone("calm", Some("anxiety"), Some(10.0)),
        ];
        let tones = emotional_tones(&interps, 10);
        assert_eq!(tones[0].emotion, "anxiety");
        assert_eq!(tones[0].count, 2);
        assert!(approx_eq(tones[0].avg_intensity, 5.0));
    }

    #[test]
    fn tones_absent_or_blank_are_skipped() {
        let interps = vec![
            interp("a"),
            interp("b").with_tone("  ", None, Some(3.0)),
            interp("c").with_tone("sad", Some(""), Some(3.0)),
        ];
        let tones = emotional_tones(&interps, 10);
        assert_eq!(tones.len(), 1);
        assert_eq!(tones[0].emotion, "sad");
    }

    // ── dream_topics ────────────────────────────────────────────────

    #[test]
    fn topics_counted_and_ranked() {
        let interps = vec![
            interp("a").with_topic("exams"),
            interp("b").with_topic("family"),
            interp("c").with_topic("family"),
            interp("d").with_topic(""),
            interp("e"),
        ];
        insta::assert_json_snapshot!(dream_topics(&interps, 10), @r#"
        [
          {
            "topic": "family",
            "count": 2
          },
          {
            "topic": "exams",
            "count": 1
          }
        ]
        "#);
    }

    #[test]
    fn empty_interpretations() {
        assert!(top_symbols(&[], 10).is_empty());
        assert!(emotional_tones(&[], 10).is_empty());
        assert!(dream_topics(&[], 10).is_empty());
    }
}
