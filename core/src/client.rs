//! Owning client that builds, sends and parses CarsXE requests.
//!
//! # Design
//! `CarsxeClient` pairs a `RequestBuilder` with a `TransportHandle`. Every
//! endpoint method is one stateless round-trip: validate and build, execute,
//! parse. Nothing is mutated after construction, so the client can be shared
//! across threads.
//!
//! Teardown is `close(self)` or plain drop. Both release an owned transport
//! exactly once; a shared transport is left alone. Since `close` consumes the
//! client, calling it twice or using the client afterwards does not compile.

use std::sync::Arc;

use serde_json::Value;

use crate::builder::RequestBuilder;
use crate::config::ClientConfig;
use crate::endpoint::{Endpoint, Params};
use crate::error::Result;
use crate::http::HttpRequest;
use crate::transport::{Transport, TransportHandle, UreqTransport};

/// Client for the CarsXE vehicle-data API.
#[derive(Debug)]
pub struct CarsxeClient {
    builder: RequestBuilder,
    transport: TransportHandle,
}

/// Configures the transport a `CarsxeClient` uses.
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<TransportHandle>,
}

impl ClientBuilder {
    /// Hand a transport to the client. It is released when the client is.
    pub fn owned_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(TransportHandle::Owned(transport));
        self
    }

    /// Use a transport the caller keeps ownership of.
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(TransportHandle::Shared(transport));
        self
    }

    pub fn build(self) -> CarsxeClient {
        let transport = self.transport.unwrap_or_else(|| {
            TransportHandle::Owned(Box::new(UreqTransport::new(self.config.timeout())))
        });
        CarsxeClient {
            builder: RequestBuilder::new(self.config),
            transport,
        }
    }
}

impl CarsxeClient {
    /// Client with its own ureq transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::builder(config).build()
    }

    /// Shorthand for `ClientConfig::new(api_key)` with default settings.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::new(ClientConfig::new(api_key)?))
    }

    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder {
            config,
            transport: None,
        }
    }

    pub fn request_builder(&self) -> &RequestBuilder {
        &self.builder
    }

    pub fn owns_transport(&self) -> bool {
        self.transport.is_owned()
    }

    /// Call any endpoint by value; see `RequestBuilder::build`.
    pub fn call(&self, endpoint: Endpoint, params: &Params) -> Result<Value> {
        let request = self.builder.build(endpoint, params)?;
        self.send(endpoint, request)
    }

    pub fn specs(&self, params: &Params) -> Result<Value> {
        self.call(Endpoint::Specs, params)
    }

    pub fn market_value(&self, params: &Params) -> Result<Value> {
        self.call(Endpoint::MarketValue, params)
    }

    pub fn history(&self, params: &Params) -> Result<Value> {
        self.call(Endpoint::History, params)
    }

    pub fn recalls(&self, params: &Params) -> Result<Value> {
        self.call(Endpoint::Recalls, params)
    }

    pub fn international_vin_decoder(&self, params: &Params) -> Result<Value> {
        self.call(Endpoint::InternationalVinDecoder, params)
    }

    pub fn plate_decoder(&self, params: &Params) -> Result<Value> {
        self.call(Endpoint::PlateDecoder, params)
    }

    pub fn images(&self, params: &Params) -> Result<Value> {
        self.call(Endpoint::Images, params)
    }

    pub fn obd_codes_decoder(&self, params: &Params) -> Result<Value> {
        self.call(Endpoint::ObdCodesDecoder, params)
    }

    pub fn year_make_model(&self, params: &Params) -> Result<Value> {
        self.call(Endpoint::YearMakeModel, params)
    }

    pub fn plate_image_recognition(&self, image_url: &str) -> Result<Value> {
        let request = self.builder.build_plate_image_recognition(image_url)?;
        self.send(Endpoint::PlateImageRecognition, request)
    }

    pub fn vin_ocr(&self, image_url: &str) -> Result<Value> {
        let request = self.builder.build_vin_ocr(image_url)?;
        self.send(Endpoint::VinOcr, request)
    }

    /// Release the transport if this client owns it.
    pub fn close(self) {}

    fn send(&self, endpoint: Endpoint, request: HttpRequest) -> Result<Value> {
        tracing::debug!(method = %request.method, endpoint = endpoint.path(), "sending CarsXE request");
        let response = self.transport.transport().execute(&request)?;
        self.builder.parse_response(&request.url, response)
    }
}

impl Drop for CarsxeClient {
    fn drop(&mut self) {
        if let TransportHandle::Owned(transport) = &self.transport {
            transport.release();
        }
    }
}
