// ⚠️ Error Types - Only input/output failures are errors
// Per-message anomalies (bad timestamp, unknown sender, pattern miss) are
// counted in the ProcessingReport and never surface here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures that abort a run.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read SMS backup {path}: {source}")]
    ReadBackup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode SMS backup XML: {0}")]
    DecodeBackup(#[from] quick_xml::DeError),

    #[error("invalid start date '{value}' (use YYYY-MM-DD)")]
    InvalidStartDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unknown time zone '{0}'")]
    InvalidTimeZone(String),

    #[error("failed to load config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("failed to write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
