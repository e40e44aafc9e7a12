//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in a background thread with its own
//! tokio runtime, then drives `CarsxeClient` over real HTTP with the default
//! ureq transport.

use std::error::Error as _;

use carsxe_core::{params, ApiError, CarsxeClient, ClientConfig, Params};
use mock_server::MockState;

const KEY: &str = "test-key";

fn start_server() -> (String, MockState) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let state = MockState::new(KEY);
    let server_state = state.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, server_state).await
        })
        .unwrap();
    });

    (format!("http://{addr}"), state)
}

fn client(base_url: &str) -> CarsxeClient {
    CarsxeClient::new(ClientConfig::new(KEY).unwrap().with_base_url(base_url))
}

#[test]
fn vin_endpoints_round_trip() {
    let (base_url, state) = start_server();
    let client = client(&base_url);
    let vin = params([("vin", "WBAFR7C57CC811956")]);

    let specs = client.specs(&vin).unwrap();
    assert_eq!(specs["endpoint"], "/specs");
    assert_eq!(specs["input"]["vin"], "WBAFR7C57CC811956");
    assert_eq!(specs["input"]["key"], KEY);
    assert_eq!(specs["input"]["source"], "rust");

    assert_eq!(client.market_value(&vin).unwrap()["endpoint"], "/v2/marketvalue");
    assert_eq!(client.history(&vin).unwrap()["endpoint"], "/history");
    assert_eq!(client.recalls(&vin).unwrap()["endpoint"], "/v1/recalls");
    assert_eq!(
        client.international_vin_decoder(&vin).unwrap()["endpoint"],
        "/v1/international-vin-decoder"
    );

    assert_eq!(state.requests_blocking().len(), 5);
}

#[test]
fn other_get_endpoints_round_trip() {
    let (base_url, _state) = start_server();
    let client = client(&base_url);

    let plate = client
        .plate_decoder(&params([("plate", "7XER187"), ("state", "CA")]))
        .unwrap();
    assert_eq!(plate["input"]["country"], "US");

    let images = client.images(&params([("make", "BMW"), ("model", "X5")])).unwrap();
    assert_eq!(images["input"]["make"], "BMW");

    let obd = client.obd_codes_decoder(&params([("code", "P0115")])).unwrap();
    assert_eq!(obd["input"]["code"], "P0115");

    let ymm = client
        .year_make_model(&params([("year", "2023"), ("make", "Toyota"), ("model", "Camry")]))
        .unwrap();
    assert_eq!(ymm["endpoint"], "/v1/ymm");
}

#[test]
fn image_endpoints_post_json() {
    let (base_url, state) = start_server();
    let client = client(&base_url);

    let result = client.plate_image_recognition("http://x/y.jpg").unwrap();
    assert_eq!(result["image"], "http://x/y.jpg");
    assert_eq!(result["input"]["key"], KEY);

    let result = client.vin_ocr("http://x/vin.jpg").unwrap();
    assert_eq!(result["endpoint"], "/v1/vinocr");

    let requests = state.requests_blocking();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.method == "POST"));
    assert_eq!(requests[0].body.as_ref().unwrap()["image"], "http://x/y.jpg");
}

#[test]
fn spoofed_reserved_parameters_are_replaced() {
    let (base_url, _state) = start_server();
    let client = client(&base_url);

    let result = client
        .specs(&params([("vin", "X"), ("KEY", "wrong"), ("Source", "python")]))
        .unwrap();
    assert_eq!(result["input"]["key"], KEY);
    assert_eq!(result["input"]["source"], "rust");
    assert!(result["input"].get("KEY").is_none());
}

#[test]
fn value_with_space_survives_round_trip() {
    let (base_url, _state) = start_server();
    let result = client(&base_url).specs(&params([("vin", "ABC 123")])).unwrap();
    assert_eq!(result["input"]["vin"], "ABC 123");
}

#[test]
fn not_found_is_a_request_error() {
    let (base_url, _state) = start_server();
    let err = client(&base_url).specs(&params([("vin", "NOTFOUND")])).unwrap_err();
    match err {
        ApiError::Request { url, status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "not found");
            assert!(url.starts_with(&format!("{base_url}/specs?")));
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[test]
fn wrong_key_is_a_request_error() {
    let (base_url, _state) = start_server();
    let client = CarsxeClient::new(ClientConfig::new("bad-key").unwrap().with_base_url(&base_url));
    let err = client.history(&params([("vin", "X")])).unwrap_err();
    assert!(matches!(err, ApiError::Request { status: 401, .. }));
}

#[test]
fn non_json_success_is_a_parse_error() {
    let (base_url, _state) = start_server();
    let err = client(&base_url)
        .obd_codes_decoder(&params([("code", "RAW")]))
        .unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[test]
fn validation_errors_send_nothing() {
    let (base_url, state) = start_server();
    let client = client(&base_url);

    assert!(matches!(client.specs(&Params::new()), Err(ApiError::Validation { .. })));
    assert!(matches!(
        client.plate_decoder(&params([("plate", "ABC"), ("country", "PK"), ("state", "Sindh")])),
        Err(ApiError::Validation { parameter }) if parameter == "district"
    ));
    assert!(matches!(client.plate_image_recognition(""), Err(ApiError::Validation { .. })));

    assert!(state.requests_blocking().is_empty());
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let err = client(&format!("http://{addr}"))
        .specs(&params([("vin", "X")]))
        .unwrap_err();
    let ApiError::Transport(inner) = &err else {
        panic!("expected transport error, got {err:?}");
    };
    // the ureq cause is part of the message, not only of the source chain
    let cause = inner.source().unwrap().to_string();
    assert!(!cause.is_empty());
    assert!(err.to_string().starts_with("transport error: GET request failed: "));
    assert!(err.to_string().ends_with(&cause), "{err}");
}
