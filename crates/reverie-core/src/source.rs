//! Record sources: the seam to the data-access collaborator.
//!
//! The analytics engine never fetches anything itself. A caller resolves both
//! record sequences through a [`RecordSource`] first and only then invokes
//! the engine, so fetch failures surface here and never as partial output.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::{CoreError, Result};
use crate::ingest::{IngestReport, ingest_dream, ingest_interpretations};
use crate::records::{DreamRecord, InterpretationRecord};

/// Supplies a user's dream records and the interpretations attached to them.
pub trait RecordSource {
    /// All dream records for `user_id`. Ordering is not guaranteed.
    fn fetch_dream_records(&self, user_id: &str) -> Result<Vec<DreamRecord>>;

    /// Interpretations whose `dream_id` is in `dream_ids`.
    fn fetch_interpretation_records(&self, dream_ids: &[String])
    -> Result<Vec<InterpretationRecord>>;
}

fn select_interpretations(
    all: &[InterpretationRecord],
    dream_ids: &[String],
) -> Vec<InterpretationRecord> {
    let wanted: HashSet<&str> = dream_ids.iter().map(String::as_str).collect();
    all.iter()
        .filter(|i| wanted.contains(i.dream_id.as_str()))
        .cloned()
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory source
// ─────────────────────────────────────────────────────────────────────────────

/// A source over records already in memory, owned by a single user.
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    user_id: String,
    dreams: Vec<DreamRecord>,
    interpretations: Vec<InterpretationRecord>,
}

impl InMemorySource {
    /// Create a source for `user_id`.
    pub fn new(
        user_id: impl Into<String>,
        dreams: Vec<DreamRecord>,
        interpretations: Vec<InterpretationRecord>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            dreams,
            interpretations,
        }
    }
}

impl RecordSource for InMemorySource {
    fn fetch_dream_records(&self, user_id: &str) -> Result<Vec<DreamRecord>> {
        if user_id != self.user_id {
            return Err(CoreError::UnknownUser {
                requested: user_id.to_owned(),
                owner: self.user_id.clone(),
            });
        }
        Ok(self.dreams.clone())
    }

    fn fetch_interpretation_records(
        &self,
        dream_ids: &[String],
    ) -> Result<Vec<InterpretationRecord>> {
        Ok(select_interpretations(&self.interpretations, dream_ids))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Journal export
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument {
    user_id: Option<String>,
    #[serde(default)]
    dreams: Vec<Value>,
    #[serde(default)]
    interpretations: Vec<Value>,
}

/// A JSON journal export: `{ "userId"?, "dreams": [...], "interpretations": [...] }`.
///
/// Records are normalized on load. Dreams carrying their own `userId` are
/// only returned for that user; dreams without one belong to the export's
/// `userId`, or to anyone when the export has none.
#[derive(Clone, Debug)]
pub struct JournalExport {
    user_id: Option<String>,
    dreams: Vec<(Option<String>, DreamRecord)>,
    interpretations: Vec<InterpretationRecord>,
    dream_report: IngestReport,
    interpretation_report: IngestReport,
}

impl JournalExport {
    /// Read and normalize an export file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let export = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            dreams = export.dreams.len(),
            interpretations = export.interpretations.len(),
            "journal export loaded"
        );
        Ok(export)
    }

    /// Parse and normalize an export document.
    pub fn from_json(content: &str) -> Result<Self> {
        let doc: ExportDocument = serde_json::from_str(content)?;

        let dreams_in = doc.dreams.len();
        let mut dreams = Vec::with_capacity(dreams_in);
        let mut dream_report = IngestReport::default();
        for value in doc.dreams {
            // Owner tags are read before ingestion discards them.
            let owner = value.get("userId").and_then(Value::as_str).map(str::to_owned);
            if let Some(dream) = ingest_dream(value, &mut dream_report) {
                dreams.push((owner, dream));
            }
        }

        let interpretations = ingest_interpretations(doc.interpretations);
        debug!(
            dreams_in,
            dreams_kept = dreams.len(),
            interpretations_kept = interpretations.records.len(),
            "journal export normalized"
        );

        Ok(Self {
            user_id: doc.user_id,
            dreams,
            interpretations: interpretations.records,
            dream_report,
            interpretation_report: interpretations.report,
        })
    }

    /// Owner declared at the export's top level.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Ingestion report for the dream records.
    pub fn dream_report(&self) -> IngestReport {
        self.dream_report
    }

    /// Ingestion report for the interpretation records.
    pub fn interpretation_report(&self) -> IngestReport {
        self.interpretation_report
    }

    fn belongs_to(&self, owner: Option<&str>, user_id: &str) -> bool {
        match owner.or(self.user_id.as_deref()) {
            Some(o) => o == user_id,
            None => true,
        }
    }
}

impl RecordSource for JournalExport {
    fn fetch_dream_records(&self, user_id: &str) -> Result<Vec<DreamRecord>> {
        if let Some(owner) = self.user_id.as_deref() {
            let any_tagged = self.dreams.iter().any(|(o, _)| o.as_deref() == Some(user_id));
            if owner != user_id && !any_tagged {
                return Err(CoreError::UnknownUser {
                    requested: user_id.to_owned(),
                    owner: owner.to_owned(),
                });
            }
        }
        Ok(self
            .dreams
            .iter()
            .filter(|(owner, _)| self.belongs_to(owner.as_deref(), user_id))
            .map(|(_, d)| d.clone())
            .collect())
    }

    fn fetch_interpretation_records(
        &self,
        dream_ids: &[String],
    ) -> Result<Vec<InterpretationRecord>> {
        Ok(select_interpretations(&self.interpretations, dream_ids))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
