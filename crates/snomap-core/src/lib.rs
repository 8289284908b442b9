//! Incremental SNOMED CT to ICD-10 batch mapping.
//!
//! Results accumulate in two CSV tables that also act as the ledger of codes
//! already processed, so repeated runs only request new codes unless a full
//! refresh is asked for.

pub mod artifacts;
pub mod batch;
pub mod error;
pub mod input;
pub mod layout;
pub mod ledger;

pub use artifacts::ArtifactStore;
pub use batch::{BatchEvent, BatchMapper};
pub use error::{CoreError, Result};
pub use input::{parse_codes, read_codes};
pub use layout::{ARTIFACT_DIR, FAILURE_TABLE, OutputLayout, SUCCESS_TABLE};
pub use ledger::{FAILURE_HEADERS, Ledger, SUCCESS_HEADERS, TableKind, read_processed_codes};
