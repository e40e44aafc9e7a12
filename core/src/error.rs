//! Error types for the CarsXE client.
//!
//! # Design
//! Every failure a call can produce maps to one `ApiError` variant. Problems
//! detected before any I/O (`Config`, `Validation`, `UnknownEndpoint`) are kept
//! apart from problems reported by the remote side (`Request`, `Parse`).
//! Transport failures keep their own type and pass through untouched.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `RequestBuilder` and `CarsxeClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client configuration is unusable, e.g. an empty API key.
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// A required parameter was missing or blank. No request was sent.
    #[error("missing required parameter: {parameter}")]
    Validation { parameter: String },

    /// The endpoint name did not match any known endpoint.
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// The server answered with a non-2xx status.
    #[error("request to {url} failed with HTTP {status}: {body}")]
    Request { url: String, status: u16, body: String },

    /// The server answered 2xx but the body was not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The request body could not be serialized.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ApiError {
    pub(crate) fn missing(parameter: &str) -> Self {
        ApiError::Validation {
            parameter: parameter.to_string(),
        }
    }
}

/// A failure below HTTP: connection refused, DNS, TLS, timeout.
#[derive(Debug, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
