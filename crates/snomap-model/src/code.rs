use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// A SNOMED CT concept identifier.
///
/// Identity is the trimmed digit string; no check-digit validation is applied.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct SnomedCode(String);

impl SnomedCode {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyCode);
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ModelError::InvalidCode(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnomedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SnomedCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SnomedCode {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SnomedCode> for String {
    fn from(code: SnomedCode) -> Self {
        code.0
    }
}

impl AsRef<str> for SnomedCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
