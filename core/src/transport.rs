//! Executing `HttpRequest` values over the network.
//!
//! # Design
//! `Transport` is the seam between request building and I/O. The default
//! implementation wraps a `ureq::Agent` with status-as-error disabled so that
//! 4xx/5xx responses come back as data and the builder interprets them.
//!
//! `TransportHandle` records who owns the transport. A client releases an
//! `Owned` transport when it is dropped; a `Shared` one belongs to the caller
//! and is never released by the client.

use std::sync::Arc;
use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Implementations must be safe to call from several threads at once.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Free pooled connections or other resources. Called at most once, by the
    /// owning client.
    fn release(&self) {}
}

/// Blocking transport backed by `ureq`.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (key, value) in &request.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (key, value) in &request.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result
            .map_err(|e| TransportError::with_source(format!("{} request failed: {e}", request.method), e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::with_source(format!("failed to read response body: {e}"), e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn release(&self) {
        tracing::debug!("releasing ureq transport");
    }
}

/// A transport together with who is responsible for releasing it.
pub enum TransportHandle {
    /// Created by or handed over to the client; released on drop.
    Owned(Box<dyn Transport>),
    /// Owned by the caller; the client never releases it.
    Shared(Arc<dyn Transport>),
}

impl TransportHandle {
    pub fn transport(&self) -> &dyn Transport {
        match self {
            TransportHandle::Owned(t) => &**t,
            TransportHandle::Shared(t) => &**t,
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, TransportHandle::Owned(_))
    }
}

impl std::fmt::Debug for TransportHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportHandle::Owned(_) => f.write_str("TransportHandle::Owned"),
            TransportHandle::Shared(_) => f.write_str("TransportHandle::Shared"),
        }
    }
}
