//! Client for the CarsXE vehicle-data API.
//!
//! # Overview
//! Covers VIN specs, market value, history, recalls, international VIN
//! decoding, plate decoding, vehicle images, OBD code lookup, plate and VIN
//! image recognition, and year/make/model lookup. Responses are returned as
//! untyped `serde_json::Value`.
//!
//! # Design
//! - `RequestBuilder` is stateless: it validates parameters, builds an
//!   `HttpRequest` and parses an `HttpResponse` without touching the network
//!   (host-does-IO), which is what the FFI crate exposes.
//! - `CarsxeClient` adds a `Transport` and performs the round-trip. It owns a
//!   ureq transport by default or borrows one supplied by the caller.
//! - Per-endpoint parameter rules live in one table (`Endpoint`) and are
//!   checked by one routine before any I/O.
//!
//! ```no_run
//! use carsxe_core::{params, CarsxeClient};
//!
//! let client = CarsxeClient::with_api_key("your-api-key")?;
//! let specs = client.specs(&params([("vin", "WBAFR7C57CC811956")]))?;
//! println!("{specs}");
//! # Ok::<(), carsxe_core::ApiError>(())
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod query;
pub mod transport;

pub use builder::RequestBuilder;
pub use client::{CarsxeClient, ClientBuilder};
pub use config::{ClientConfig, CLIENT_SOURCE, DEFAULT_BASE_URL};
pub use endpoint::{params, Endpoint, Params};
pub use error::{ApiError, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::build_query_string;
pub use transport::{Transport, TransportHandle, UreqTransport};
