//! Declarative table of CarsXE endpoints and their parameter rules.
//!
//! # Design
//! Each endpoint carries its path, method and required parameters. One routine,
//! `Endpoint::prepare`, validates a caller's parameters against that table and
//! applies defaults on a private copy, so no endpoint method duplicates
//! validation logic and caller-owned maps are never mutated.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ApiError, Result};
use crate::http::HttpMethod;

/// Caller-supplied request parameters.
pub type Params = BTreeMap<String, String>;

/// Build a `Params` map from string pairs.
pub fn params<K, V, I>(pairs: I) -> Params
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

const DEFAULT_PLATE_COUNTRY: &str = "US";

/// Parameter carrying the image URL for the POST endpoints.
pub const IMAGE_URL_PARAM: &str = "imageUrl";

/// Every endpoint the client can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Specs,
    MarketValue,
    History,
    Recalls,
    InternationalVinDecoder,
    PlateDecoder,
    Images,
    ObdCodesDecoder,
    PlateImageRecognition,
    VinOcr,
    YearMakeModel,
}

impl Endpoint {
    pub const ALL: [Endpoint; 11] = [
        Endpoint::Specs,
        Endpoint::MarketValue,
        Endpoint::History,
        Endpoint::Recalls,
        Endpoint::InternationalVinDecoder,
        Endpoint::PlateDecoder,
        Endpoint::Images,
        Endpoint::ObdCodesDecoder,
        Endpoint::PlateImageRecognition,
        Endpoint::VinOcr,
        Endpoint::YearMakeModel,
    ];

    /// Path relative to the base URL, without a leading slash.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Specs => "specs",
            Endpoint::MarketValue => "v2/marketvalue",
            Endpoint::History => "history",
            Endpoint::Recalls => "v1/recalls",
            Endpoint::InternationalVinDecoder => "v1/international-vin-decoder",
            Endpoint::PlateDecoder => "v2/platedecoder",
            Endpoint::Images => "images",
            Endpoint::ObdCodesDecoder => "obdcodesdecoder",
            Endpoint::PlateImageRecognition => "platerecognition",
            Endpoint::VinOcr => "v1/vinocr",
            Endpoint::YearMakeModel => "v1/ymm",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Specs => "specs",
            Endpoint::MarketValue => "market_value",
            Endpoint::History => "history",
            Endpoint::Recalls => "recalls",
            Endpoint::InternationalVinDecoder => "international_vin_decoder",
            Endpoint::PlateDecoder => "plate_decoder",
            Endpoint::Images => "images",
            Endpoint::ObdCodesDecoder => "obd_codes_decoder",
            Endpoint::PlateImageRecognition => "plate_image_recognition",
            Endpoint::VinOcr => "vin_ocr",
            Endpoint::YearMakeModel => "year_make_model",
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Endpoint::PlateImageRecognition | Endpoint::VinOcr => HttpMethod::Post,
            _ => HttpMethod::Get,
        }
    }

    /// Parameters that must be present and non-blank, before conditional rules.
    pub fn required(self) -> &'static [&'static str] {
        match self {
            Endpoint::Specs
            | Endpoint::MarketValue
            | Endpoint::History
            | Endpoint::Recalls
            | Endpoint::InternationalVinDecoder => &["vin"],
            Endpoint::PlateDecoder => &["plate"],
            Endpoint::Images => &["make", "model"],
            Endpoint::ObdCodesDecoder => &["code"],
            Endpoint::PlateImageRecognition | Endpoint::VinOcr => &[IMAGE_URL_PARAM],
            Endpoint::YearMakeModel => &["year", "make", "model"],
        }
    }

    /// Validate `input` for this endpoint and return the parameters to send.
    ///
    /// The returned map is a copy with defaults applied. Fails on the first
    /// missing or blank parameter in declaration order.
    pub fn prepare(self, input: &Params) -> Result<Params> {
        let mut prepared = input.clone();

        for name in self.required() {
            require(&prepared, name)?;
        }

        if self == Endpoint::PlateDecoder {
            if is_blank(prepared.get("country")) {
                prepared.insert("country".to_string(), DEFAULT_PLATE_COUNTRY.to_string());
            }
            let country = prepared
                .get("country")
                .map(|c| c.trim().to_ascii_lowercase())
                .unwrap_or_default();
            let extra: &[&str] = if country == "pk" || country == "pakistan" {
                &["state", "district"]
            } else {
                &["state"]
            };
            for name in extra {
                require(&prepared, name)?;
            }
        }

        Ok(prepared)
    }
}

fn is_blank(value: Option<&String>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn require(params: &Params, name: &str) -> Result<()> {
    if is_blank(params.get(name)) {
        return Err(ApiError::missing(name));
    }
    Ok(())
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Endpoint {
    type Err = ApiError;

    /// Accepts either the path (`v2/marketvalue`) or the name (`market_value`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().trim_start_matches('/');
        Endpoint::ALL
            .into_iter()
            .find(|e| e.path().eq_ignore_ascii_case(s) || e.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ApiError::UnknownEndpoint(s.to_string()))
    }
}
