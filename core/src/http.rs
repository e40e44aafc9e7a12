//! HTTP request and response types shared by the builder and transports.
//!
//! # Design
//! Requests and responses are plain data. `RequestBuilder` produces
//! `HttpRequest` values and consumes `HttpResponse` values without touching
//! the network; a `Transport` (or a foreign host through the FFI crate)
//! executes the round-trip in between.
//!
//! All fields use owned types so values can cross the FFI boundary without
//! lifetime concerns.

use std::fmt;

/// HTTP method used by the CarsXE endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the encoded query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
