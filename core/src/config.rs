//! Client configuration.

use std::time::Duration;

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.carsxe.com";

/// Identifier sent as the reserved `source` query parameter.
pub const CLIENT_SOURCE: &str = "rust";

pub const API_KEY_ENV: &str = "CARSXE_API_KEY";
pub const BASE_URL_ENV: &str = "CARSXE_BASE_URL";
pub const TIMEOUT_ENV: &str = "CARSXE_TIMEOUT_SECS";

/// Immutable connection settings shared by every call a client makes.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Fails with `ApiError::Config` if `api_key` is empty or whitespace.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ApiError::Config("API key must not be empty".to_string()));
        }
        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        })
    }

    /// Read `CARSXE_API_KEY`, and optionally `CARSXE_BASE_URL` and
    /// `CARSXE_TIMEOUT_SECS`, from the environment.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| ApiError::Config(format!("{API_KEY_ENV} is not set")))?;
        let mut config = Self::new(api_key)?;
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config = config.with_base_url(&base_url);
        }
        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ApiError::Config(format!("{TIMEOUT_ENV} is not a number: {raw}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Override the base URL. Trailing slashes are stripped; an empty value
    /// keeps the default.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !trimmed.is_empty() {
            self.base_url = trimmed.to_string();
        }
        self
    }

    /// Overall deadline for one request, enforced by the transport.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

// Keep the key out of logs and panic messages.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
