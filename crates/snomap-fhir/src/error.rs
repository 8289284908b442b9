//! Error types for the terminology client.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration or talking to the terminology server.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FhirError {
    /// Credentials file could not be read.
    #[error("failed to read credentials {path}: {source}")]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Credentials file is not valid YAML for the expected shape.
    #[error("failed to parse credentials {path}: {source}")]
    CredentialsParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required credential is absent or blank.
    #[error("missing required credential '{0}'")]
    MissingCredential(&'static str),

    /// An endpoint is not an absolute http(s) URL.
    #[error("invalid {field} '{value}': {reason}")]
    InvalidEndpoint {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Transport-level failure (connect, timeout, body read).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The token endpoint rejected the client credentials.
    #[error("token request failed ({status}): {message}")]
    Auth { status: u16, message: String },

    /// The token endpoint answered without an `access_token`.
    #[error("token response did not contain an access_token")]
    MissingAccessToken,

    /// The terminology server answered with a non-success status.
    #[error("terminology server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Result type alias for terminology client operations.
pub type Result<T> = std::result::Result<T, FhirError>;
