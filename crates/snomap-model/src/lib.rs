//! Domain types shared by the snomap crates.

pub mod code;
pub mod error;
pub mod outcome;
pub mod summary;

pub use code::SnomedCode;
pub use error::{ModelError, Result};
pub use outcome::{MappingOutcome, MappingRecord, NO_MAPPING_FOUND, TIMESTAMP_FORMAT};
pub use summary::BatchSummary;
