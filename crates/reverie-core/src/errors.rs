//! Core error types.
//!
//! Only the record-source boundary can fail. Ingestion corrects or drops
//! individual records and never returns an error for the batch.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while fetching records from a [`crate::source::RecordSource`].
#[derive(Debug, Error)]
pub enum CoreError {
    /// Failed to read a journal export from disk.
    #[error("failed to read journal export {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The journal export was not valid JSON of the expected shape.
    #[error("failed to parse journal export: {0}")]
    Json(#[from] serde_json::Error),
    /// The source holds records for a different user.
    #[error("no records for user {requested} (source belongs to {owner})")]
    UnknownUser {
        /// User that was requested.
        requested: String,
        /// User the source belongs to.
        owner: String,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
