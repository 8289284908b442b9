//! Error types for batch mapping.

use std::path::PathBuf;

use thiserror::Error;

use snomap_model::ModelError;

/// Errors that abort a batch run.
///
/// Per-code request failures never surface here; they are recorded in the
/// failure table instead.
#[derive(Debug, Error)]
pub enum CoreError {
    // === Input Errors ===
    /// Code list could not be read.
    #[error("failed to read input {path}: {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of the code list is not a SNOMED CT code.
    #[error("{path}:{line}: {source}")]
    InvalidCode {
        path: PathBuf,
        line: usize,
        #[source]
        source: ModelError,
    },

    // === Ledger Errors ===
    /// An existing output table could not be parsed.
    #[error("failed to read ledger {path}: {source}")]
    LedgerRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// An existing output table lacks the code column.
    #[error("ledger {path} has no snomed_code column")]
    LedgerFormat { path: PathBuf },

    /// Appending to an output table failed.
    #[error("failed to write ledger {path}: {source}")]
    LedgerWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    // === Artifact Errors ===
    /// Writing a raw response artifact failed.
    #[error("failed to write artifact {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing a raw response artifact failed.
    #[error("failed to serialize artifact {path}: {source}")]
    ArtifactSerialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Creating an output directory failed.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for batch operations.
pub type Result<T> = std::result::Result<T, CoreError>;
