//! FILENAME: core/persistence/src/error.rs

use engine::SpreadsheetError;
use thiserror::Error;

/// Every way reading or writing a snapshot can fail.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot version {found:?} does not match expected version {expected:?}")]
    VersionMismatch { expected: String, found: String },

    #[error("Cannot restore cell {cell}: {source}")]
    Replay {
        cell: String,
        #[source]
        source: SpreadsheetError,
    },
}
