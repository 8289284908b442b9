//! Blocking client for the terminology server's ConceptMap `$translate` operation.

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;
use tracing::{debug, warn};

use snomap_model::SnomedCode;

use crate::auth::TokenProvider;
use crate::config::ServerConfig;
use crate::error::{FhirError, Result};
use crate::payload_log::redact_payload;
use crate::translate::{Parameters, TranslateResponse};

const FHIR_JSON: &str = "application/fhir+json";

const USER_AGENT_VALUE: &str = concat!("snomap/", env!("CARGO_PKG_VERSION"));

/// Anything that can translate one SNOMED CT code into a classified response.
pub trait Translator {
    fn translate(&self, code: &SnomedCode) -> Result<TranslateResponse>;
}

/// Terminology server client authenticated with OAuth2 client credentials.
pub struct TerminologyClient {
    client: Client,
    config: ServerConfig,
    tokens: TokenProvider,
}

impl TerminologyClient {
    /// Create a client; no network traffic happens until the first translation.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(FhirError::ClientBuild)?;

        Ok(Self {
            client,
            config,
            tokens: TokenProvider::new(),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    fn post_translate(&self, body: &Parameters, token: &str) -> Result<Response> {
        let url = self.config.translate_url();
        debug!(%url, "posting translate request");
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(ACCEPT, FHIR_JSON)
            .header(CONTENT_TYPE, FHIR_JSON)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .body(serde_json::to_vec(body)?)
            .send()?;
        Ok(response)
    }
}

impl Translator for TerminologyClient {
    fn translate(&self, code: &SnomedCode) -> Result<TranslateResponse> {
        let body = Parameters::translate_request(code);

        let token = self.tokens.token(&self.client, &self.config)?;
        let mut response = self.post_translate(&body, &token)?;

        // Expired or revoked token: re-authenticate once.
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(code = %code, "translate request unauthorized, refreshing token");
            self.tokens.invalidate();
            let token = self.tokens.token(&self.client, &self.config)?;
            response = self.post_translate(&body, &token)?;
        }

        let status = response.status();
        let text = response.text()?;
        debug!(
            code = %code,
            status = status.as_u16(),
            body = %redact_payload(&text),
            "translate response received"
        );

        if !status.is_success() {
            return Err(FhirError::Server {
                status: status.as_u16(),
                message: text,
            });
        }

        let payload: Value = serde_json::from_str(&text)?;
        Ok(TranslateResponse::from_payload(
            payload,
            self.config.target_system(),
        ))
    }
}
