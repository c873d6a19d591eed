//! Error types for loading and analyzing peer-review tables.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by ingestion, normalization and export.
#[derive(Debug, Error)]
pub enum RatingError {
    /// The input folder is missing or is not a directory.
    #[error("cannot read input folder {path}: {source}")]
    InputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV file could not be opened.
    #[error("cannot open {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV file is missing one of the required columns.
    #[error("malformed input {path}: missing column `{column}`")]
    MalformedInput { path: PathBuf, column: String },

    /// A CSV row could not be read or decoded.
    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A group has no members, so the expected share is undefined.
    #[error("group `{0}` has no members")]
    EmptyGroup(String),

    /// Export was requested before an export folder was chosen.
    #[error("no export folder chosen")]
    NoExportDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
