//! FHIR terminology client for mapping SNOMED CT codes to ICD-10.
//!
//! The client authenticates with the OAuth2 client-credentials grant and calls
//! `ConceptMap/$translate` once per code, returning the raw response payload
//! alongside the ICD-10 code found in it, if any.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use snomap_fhir::{ServerConfig, TerminologyClient, Translator};
//! use snomap_model::SnomedCode;
//!
//! fn lookup() -> snomap_fhir::Result<()> {
//!     let config = ServerConfig::load(Path::new("cred.yml"))?;
//!     let client = TerminologyClient::new(config)?;
//!     let response = client.translate(&SnomedCode::new("39065001").expect("digits"))?;
//!     println!("{:?}", response.target_code);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod payload_log;
pub mod translate;

pub use auth::{AccessToken, TokenProvider};
pub use client::{TerminologyClient, Translator};
pub use config::{
    DEFAULT_CREDENTIALS_FILE, DEFAULT_TARGET_SYSTEM, DEFAULT_TIMEOUT_SECS, SNOMED_SYSTEM,
    ServerConfig,
};
pub use error::{FhirError, Result};
pub use payload_log::{payload_logging_enabled, redact_payload, set_payload_logging};
pub use translate::{Coding, Parameter, Parameters, TranslateResponse};
