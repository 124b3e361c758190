//! # reverie
//!
//! Reads a journal export, runs the analytics engine over one user's
//! records and prints the resulting `DreamAnalytics` as JSON.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use reverie_analytics::AnalyticsEngine;
use reverie_core::logging::init_subscriber;
use reverie_core::source::{JournalExport, RecordSource};
use reverie_settings::{ReverieSettings, load_settings, load_settings_from_path};
use tracing::info;

/// User assumed when neither `--user` nor the export names one.
const DEFAULT_USER: &str = "local";

/// Dream journal analytics.
#[derive(Parser, Debug)]
#[command(name = "reverie", about = "Compute dream analytics from a journal export")]
struct Cli {
    /// Journal export (`{ "userId", "dreams": [...], "interpretations": [...] }`).
    #[arg(long)]
    export: PathBuf,

    /// User whose dreams to analyze (defaults to the export's `userId`).
    #[arg(long)]
    user: Option<String>,

    /// Settings file (defaults to `~/.reverie/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Reference instant, RFC 3339 (defaults to now).
    #[arg(long, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Print single-line JSON.
    #[arg(long)]
    compact: bool,
}

fn parse_now(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

fn load(cli: &Cli) -> Result<ReverieSettings> {
    match &cli.settings {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => load_settings().context("Failed to load settings"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load(&cli)?;
    init_subscriber(&settings.logging.level);

    let export = JournalExport::load(&cli.export)
        .with_context(|| format!("Failed to read journal export {}", cli.export.display()))?;
    info!(
        dreams = ?export.dream_report(),
        interpretations = ?export.interpretation_report(),
        "ingestion report"
    );

    let user = cli
        .user
        .clone()
        .or_else(|| export.user_id().map(str::to_owned))
        .unwrap_or_else(|| DEFAULT_USER.to_owned());

    let dreams = export
        .fetch_dream_records(&user)
        .with_context(|| format!("Failed to fetch dreams for {user}"))?;
    let dream_ids: Vec<String> = dreams.iter().map(|d| d.id.clone()).collect();
    let interpretations = export
        .fetch_interpretation_records(&dream_ids)
        .context("Failed to fetch interpretations")?;

    let engine = AnalyticsEngine::from_settings(&settings.analytics);
    let now = cli.now.unwrap_or_else(Utc::now);
    info!(
        user = %user,
        dreams = dreams.len(),
        interpretations = interpretations.len(),
        timezone = %engine.options().timezone,
        "computing analytics"
    );
    let analytics = engine.compute_at(&dreams, &interpretations, now);

    let json = if cli.compact {
        serde_json::to_string(&analytics)
    } else {
        serde_json::to_string_pretty(&analytics)
    }
    .context("Failed to serialize analytics")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_args() {
        let cli = Cli::try_parse_from(["reverie", "--export", "journal.json"]).unwrap();
        assert_eq!(cli.export, PathBuf::from("journal.json"));
        assert!(cli.user.is_none());
        assert!(cli.now.is_none());
        assert!(!cli.compact);
    }

    #[test]
    fn parses_all_args() {
        let cli = Cli::try_parse_from([
            "reverie",
            "--export",
            "j.json",
            "--user",
            "u-7",
            "--settings",
            "s.json",
            "--now",
            "2026-04-01T08:00:00+02:00",
            "--compact",
        ])
        .unwrap();
        assert_eq!(cli.user.as_deref(), Some("u-7"));
        assert_eq!(cli.settings, Some(PathBuf::from("s.json")));
        assert_eq!(cli.now.unwrap().to_rfc3339(), "2026-04-01T06:00:00+00:00");
        assert!(cli.compact);
    }

    #[test]
    fn export_is_required() {
        assert!(Cli::try_parse_from(["reverie"]).is_err());
    }

    #[test]
    fn rejects_bad_timestamp() {
        let err = parse_now("last tuesday").unwrap_err();
        assert!(err.contains("RFC 3339"));
    }

    #[test]
    fn explicit_settings_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"analytics": {"moodTrendDays": 7}}"#).unwrap();
        let cli = Cli::try_parse_from([
            "reverie",
            "--export",
            "j.json",
            "--settings",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(load(&cli).unwrap().analytics.mood_trend_days, 7);
    }
}
