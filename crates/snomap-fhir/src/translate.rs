//! FHIR `Parameters` payloads for the ConceptMap `$translate` operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use snomap_model::{MappingOutcome, SnomedCode};

use crate::config::SNOMED_SYSTEM;

/// A FHIR `Parameters` resource, reduced to the fields `$translate` uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub resource_type: String,
    #[serde(default)]
    pub parameter: Vec<Parameter>,
}

/// One named parameter, or a `part` of a compound parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_coding: Option<Coding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub part: Vec<Parameter>,
}

/// A code within a code system, as carried by `valueCoding`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Parameters {
    /// Request body translating a single SNOMED CT coding.
    pub fn translate_request(code: &SnomedCode) -> Self {
        Self {
            resource_type: "Parameters".to_string(),
            parameter: vec![Parameter {
                name: "coding".to_string(),
                value_coding: Some(Coding {
                    system: Some(SNOMED_SYSTEM.to_string()),
                    code: Some(code.as_str().to_string()),
                    display: None,
                }),
                ..Parameter::default()
            }],
        }
    }

    /// First top-level parameter with the given name.
    pub fn find(&self, name: &str) -> Option<&Parameter> {
        self.parameter.iter().find(|p| p.name == name)
    }

    /// Target code from a translate response.
    ///
    /// Requires `result = true`, then takes the first `match` and returns the code of its
    /// `concept` part whose coding belongs to `target_system`.
    pub fn target_code(&self, target_system: &str) -> Option<String> {
        if self.find("result")?.value_boolean != Some(true) {
            return None;
        }
        self.find("match")?
            .part
            .iter()
            .filter(|part| part.name == "concept")
            .filter_map(|part| part.value_coding.as_ref())
            .find(|coding| coding.system.as_deref() == Some(target_system))
            .and_then(|coding| coding.code.clone())
            .filter(|code| !code.trim().is_empty())
    }
}

/// Raw server payload together with its classified target code.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateResponse {
    pub payload: Value,
    pub target_code: Option<String>,
}

impl TranslateResponse {
    /// Classify a raw payload against the target code system.
    ///
    /// Payloads that are not a `Parameters` resource classify as "no mapping".
    pub fn from_payload(payload: Value, target_system: &str) -> Self {
        let target_code = serde_json::from_value::<Parameters>(payload.clone())
            .ok()
            .filter(|params| params.resource_type == "Parameters")
            .and_then(|params| params.target_code(target_system));
        Self {
            payload,
            target_code,
        }
    }

    pub fn outcome(&self) -> MappingOutcome {
        match &self.target_code {
            Some(code) => MappingOutcome::success(code.clone()),
            None => MappingOutcome::no_mapping(),
        }
    }
}
