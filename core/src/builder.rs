//! Stateless request builder and response parser for the CarsXE API.
//!
//! # Design
//! `RequestBuilder` holds only the API key and base URL and carries no mutable
//! state between calls. Each endpoint has a `build_*` method producing an
//! `HttpRequest`; every response goes through `parse_response`. The caller (or
//! `CarsxeClient`) executes the HTTP round-trip in between, so this half of
//! the crate is deterministic and free of I/O.

use serde::Serialize;
use serde_json::Value;

use crate::config::{ClientConfig, CLIENT_SOURCE};
use crate::endpoint::{Endpoint, Params, IMAGE_URL_PARAM};
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::{build_query_string, build_url, with_reserved};

#[derive(Serialize)]
struct ImageBody<'a> {
    image: &'a str,
}

/// Builds authenticated requests and parses responses without touching the
/// network.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    config: ClientConfig,
}

impl RequestBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a request for any endpoint from an open parameter map.
    ///
    /// POST endpoints read the image URL from `imageUrl`, or from `image_url`
    /// when `imageUrl` is missing or blank.
    pub fn build(&self, endpoint: Endpoint, params: &Params) -> Result<HttpRequest> {
        match endpoint.method() {
            HttpMethod::Get => self.build_get(endpoint, params),
            HttpMethod::Post => {
                let image_url = [IMAGE_URL_PARAM, "image_url"]
                    .iter()
                    .filter_map(|name| params.get(*name))
                    .find(|v| !v.trim().is_empty())
                    .map(String::as_str)
                    .unwrap_or("");
                self.build_image(endpoint, image_url)
            }
        }
    }

    pub fn build_specs(&self, params: &Params) -> Result<HttpRequest> {
        self.build_get(Endpoint::Specs, params)
    }

    pub fn build_market_value(&self, params: &Params) -> Result<HttpRequest> {
        self.build_get(Endpoint::MarketValue, params)
    }

    pub fn build_history(&self, params: &Params) -> Result<HttpRequest> {
        self.build_get(Endpoint::History, params)
    }

    pub fn build_recalls(&self, params: &Params) -> Result<HttpRequest> {
        self.build_get(Endpoint::Recalls, params)
    }

    pub fn build_international_vin_decoder(&self, params: &Params) -> Result<HttpRequest> {
        self.build_get(Endpoint::InternationalVinDecoder, params)
    }

    /// `country` defaults to `US`. Pakistan (`pk` / `pakistan`) also needs
    /// `state` and `district`; every other country needs `state`.
    pub fn build_plate_decoder(&self, params: &Params) -> Result<HttpRequest> {
        self.build_get(Endpoint::PlateDecoder, params)
    }

    pub fn build_images(&self, params: &Params) -> Result<HttpRequest> {
        self.build_get(Endpoint::Images, params)
    }

    pub fn build_obd_codes_decoder(&self, params: &Params) -> Result<HttpRequest> {
        self.build_get(Endpoint::ObdCodesDecoder, params)
    }

    pub fn build_year_make_model(&self, params: &Params) -> Result<HttpRequest> {
        self.build_get(Endpoint::YearMakeModel, params)
    }

    pub fn build_plate_image_recognition(&self, image_url: &str) -> Result<HttpRequest> {
        self.build_image(Endpoint::PlateImageRecognition, image_url)
    }

    pub fn build_vin_ocr(&self, image_url: &str) -> Result<HttpRequest> {
        self.build_image(Endpoint::VinOcr, image_url)
    }

    fn build_get(&self, endpoint: Endpoint, params: &Params) -> Result<HttpRequest> {
        let prepared = endpoint.prepare(params)?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.url_for(endpoint, &prepared),
            headers: Vec::new(),
            body: None,
        })
    }

    fn build_image(&self, endpoint: Endpoint, image_url: &str) -> Result<HttpRequest> {
        let prepared = endpoint.prepare(&Params::from([(
            IMAGE_URL_PARAM.to_string(),
            image_url.to_string(),
        )]))?;
        let image = prepared.get(IMAGE_URL_PARAM).map(String::as_str).unwrap_or(image_url);
        let body = serde_json::to_string(&ImageBody { image })
            .map_err(ApiError::Serialization)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url_for(endpoint, &Params::new()),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    fn url_for(&self, endpoint: Endpoint, params: &Params) -> String {
        let merged = with_reserved(params, self.config.api_key(), CLIENT_SOURCE);
        let query = build_query_string(merged.iter().map(|(k, v)| (k.as_str(), Some(v.as_str()))));
        build_url(self.config.base_url(), endpoint.path(), &query)
    }

    /// Turn a response into parsed JSON, or the matching error.
    pub fn parse_response(&self, url: &str, response: HttpResponse) -> Result<Value> {
        if !response.is_success() {
            tracing::warn!(status = response.status, "CarsXE request failed");
            return Err(ApiError::Request {
                url: url.to_string(),
                status: response.status,
                body: response.body,
            });
        }
        serde_json::from_str(&response.body).map_err(ApiError::Parse)
    }
}
