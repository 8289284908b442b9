use thiserror::Error;

/// Validation errors for model values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Input was empty or whitespace only.
    #[error("SNOMED CT code is empty")]
    EmptyCode,
    /// Input contained something other than ASCII digits.
    #[error("invalid SNOMED CT code '{0}': expected digits only")]
    InvalidCode(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
