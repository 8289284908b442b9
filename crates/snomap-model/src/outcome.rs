//! Outcome of a single mapping attempt.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::SnomedCode;

/// Failure reason recorded when the server answered but returned no target code.
pub const NO_MAPPING_FOUND: &str = "No mapping found";

/// Timestamp layout used in the output tables.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Result of classifying a terminology server response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MappingOutcome {
    /// The server returned an ICD-10 target for the code.
    Success { icd10_code: String },
    /// No target was returned, or the request failed.
    Failure { reason: String },
}

impl MappingOutcome {
    pub fn success(icd10_code: impl Into<String>) -> Self {
        Self::Success {
            icd10_code: icd10_code.into(),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn no_mapping() -> Self {
        Self::failure(NO_MAPPING_FOUND)
    }

    /// Failure for a request that never produced a usable response.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::failure(format!("ERROR: {message}"))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// One mapping attempt, ready to be appended to an output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub code: SnomedCode,
    #[serde(flatten)]
    pub outcome: MappingOutcome,
    pub timestamp: DateTime<Local>,
}

impl MappingRecord {
    pub fn new(code: SnomedCode, outcome: MappingOutcome) -> Self {
        Self {
            code,
            outcome,
            timestamp: Local::now(),
        }
    }

    #[must_use]
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
