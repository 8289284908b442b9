//! Terminology server configuration.
//!
//! Credentials are read once from a YAML file at startup and handed to the
//! client as an immutable [`ServerConfig`]. Nothing in this crate reads
//! process-wide state after that point.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::error::{FhirError, Result};

/// Default credentials file name, resolved against the working directory.
pub const DEFAULT_CREDENTIALS_FILE: &str = "cred.yml";

/// Code system of the SNOMED CT source codings.
pub const SNOMED_SYSTEM: &str = "http://snomed.info/sct";

/// Code system whose concepts are accepted as the ICD-10 target.
pub const DEFAULT_TARGET_SYSTEM: &str = "http://hl7.org/fhir/sid/icd-10-am";

/// HTTP request timeout when the credentials file does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw shape of the credentials file.
#[derive(Debug, Default, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    token_endpoint: Option<String>,
    #[serde(default)]
    fhir_endpoint: Option<String>,
    #[serde(default)]
    target_system: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

/// Validated connection settings for the terminology server.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    client_id: String,
    client_secret: String,
    token_endpoint: Url,
    fhir_endpoint: Url,
    target_system: String,
    timeout: Duration,
}

impl ServerConfig {
    /// Build a configuration from explicit values with default target system and timeout.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_endpoint: &str,
        fhir_endpoint: &str,
    ) -> Result<Self> {
        let client_id = required("client_id", Some(client_id.into()))?;
        let client_secret = required("client_secret", Some(client_secret.into()))?;
        Ok(Self {
            client_id,
            client_secret,
            token_endpoint: parse_endpoint("token_endpoint", token_endpoint)?,
            fhir_endpoint: parse_endpoint("fhir_endpoint", fhir_endpoint)?,
            target_system: DEFAULT_TARGET_SYSTEM.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Load and validate a YAML credentials file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| FhirError::CredentialsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text, path)
    }

    /// Parse credentials from YAML text; `origin` is used in error messages only.
    pub fn from_yaml(text: &str, origin: &Path) -> Result<Self> {
        let raw: CredentialsFile =
            serde_yaml::from_str(text).map_err(|source| FhirError::CredentialsParse {
                path: PathBuf::from(origin),
                source,
            })?;
        let mut config = Self::new(
            required("client_id", raw.client_id)?,
            required("client_secret", raw.client_secret)?,
            &required("token_endpoint", raw.token_endpoint)?,
            &required("fhir_endpoint", raw.fhir_endpoint)?,
        )?;
        if let Some(system) = raw.target_system.filter(|s| !s.trim().is_empty()) {
            config.target_system = system.trim().to_string();
        }
        if let Some(secs) = raw.timeout_secs.filter(|secs| *secs > 0) {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// OAuth2 client identifier.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Where client-credentials tokens are requested.
    pub fn token_endpoint(&self) -> &Url {
        &self.token_endpoint
    }

    /// FHIR base URL; `$translate` is resolved under it.
    pub fn fhir_endpoint(&self) -> &Url {
        &self.fhir_endpoint
    }

    /// Code system a match concept must belong to.
    pub fn target_system(&self) -> &str {
        &self.target_system
    }

    /// Per-request HTTP timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// URL of the `ConceptMap/$translate` operation under the FHIR base.
    pub fn translate_url(&self) -> String {
        format!(
            "{}/ConceptMap/$translate",
            self.fhir_endpoint.as_str().trim_end_matches('/')
        )
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("token_endpoint", &self.token_endpoint.as_str())
            .field("fhir_endpoint", &self.fhir_endpoint.as_str())
            .field("target_system", &self.target_system)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(FhirError::MissingCredential(field)),
    }
}

fn parse_endpoint(field: &'static str, value: &str) -> Result<Url> {
    let url = Url::parse(value.trim()).map_err(|e| FhirError::InvalidEndpoint {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FhirError::InvalidEndpoint {
            field,
            value: value.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}
