//! # reverie-core
//!
//! Foundation types for Reverie dream analytics.
//!
//! - **Records**: [`records::DreamRecord`], [`records::InterpretationRecord`],
//!   [`records::EmotionalTone`]: validated, immutable snapshots
//! - **Ingestion**: [`ingest`] turns permissive wire records into validated
//!   ones, dropping or correcting malformed values one record at a time
//! - **Sources**: [`source::RecordSource`] is the seam to the data-access
//!   collaborator, with in-memory and JSON journal export implementations
//! - **Errors**: [`errors::CoreError`] via `thiserror`
//! - **Logging**: [`logging::init_subscriber`] and log capture for tests
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `reverie-analytics` and the `reverie` binary.

#![deny(unsafe_code)]

pub mod errors;
pub mod ingest;
pub mod logging;
pub mod records;
pub mod source;

pub use errors::{CoreError, Result};
pub use records::{DreamRecord, EmotionalTone, InterpretationRecord};
