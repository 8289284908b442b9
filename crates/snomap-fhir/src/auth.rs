//! OAuth2 client-credentials token handling.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use crate::config::ServerConfig;
use crate::error::{FhirError, Result};

/// Tokens this close to expiry are treated as expired.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// A bearer token and the instant after which it should not be used.
#[derive(Debug, Clone)]
pub struct AccessToken {
    value: String,
    expires_at: Option<Instant>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_in: Option<Duration>) -> Self {
        let now = Instant::now();
        Self {
            value: value.into(),
            expires_at: expires_in.map(|ttl| now + ttl.saturating_sub(EXPIRY_MARGIN)),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Tokens without `expires_in` stay valid until the server rejects them.
    #[must_use]
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// Acquires and caches an access token for the configured client.
#[derive(Debug, Default)]
pub struct TokenProvider {
    cache: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token, requesting a new one when absent or expired.
    pub fn token(&self, client: &Client, config: &ServerConfig) -> Result<String> {
        {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(token) = cache.as_ref().filter(|t| t.is_fresh(Instant::now())) {
                return Ok(token.value().to_string());
            }
        }

        let token = request_token(client, config)?;
        let value = token.value().to_string();
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(value)
    }

    /// Drop the cached token so the next call re-authenticates.
    pub fn invalidate(&self) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

fn request_token(client: &Client, config: &ServerConfig) -> Result<AccessToken> {
    debug!(endpoint = %config.token_endpoint(), "requesting access token");

    let response = client
        .post(config.token_endpoint().clone())
        .header(ACCEPT, "application/json")
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", config.client_id()),
            ("client_secret", config.client_secret()),
        ])
        .send()?;

    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(FhirError::Auth {
            status: status.as_u16(),
            message,
        });
    }

    let body: TokenResponse = serde_json::from_str(&response.text()?)?;
    let value = body
        .access_token
        .filter(|t| !t.trim().is_empty())
        .ok_or(FhirError::MissingAccessToken)?;
    debug!(expires_in = ?body.expires_in, "access token acquired");
    Ok(AccessToken::new(value, body.expires_in.map(Duration::from_secs)))
}
