//! In-process stand-in for the CarsXE API.
//!
//! Serves every endpoint path the client knows about, checks the `key` query
//! parameter, and echoes what it received. A few magic inputs trigger error
//! paths: VIN `NOTFOUND` returns 404 `not found`, OBD code `RAW` returns a 200
//! with a non-JSON body. Every request is recorded in `MockState`.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const GET_PATHS: [&str; 9] = [
    "/specs",
    "/v2/marketvalue",
    "/history",
    "/v1/recalls",
    "/v1/international-vin-decoder",
    "/v2/platedecoder",
    "/images",
    "/obdcodesdecoder",
    "/v1/ymm",
];

pub const POST_PATHS: [&str; 2] = ["/platerecognition", "/v1/vinocr"];

pub const NOT_FOUND_VIN: &str = "NOTFOUND";
pub const RAW_OBD_CODE: &str = "RAW";

/// One request as seen by the mock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub body: Option<Value>,
}

#[derive(Deserialize)]
pub struct ImageRequest {
    pub image: String,
}

/// Shared state: the accepted API key and the request log.
#[derive(Clone, Debug)]
pub struct MockState {
    api_key: Arc<str>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl MockState {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Arc::from(api_key),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// Blocking variant for callers outside the server's runtime.
    pub fn requests_blocking(&self) -> Vec<RecordedRequest> {
        self.requests.blocking_read().clone()
    }

    async fn record(&self, request: RecordedRequest) {
        tracing::info!(method = %request.method, path = %request.path, "request received");
        self.requests.write().await.push(request);
    }
}

pub fn app(state: MockState) -> Router {
    let mut router: Router<MockState> = Router::new();
    for path in GET_PATHS {
        router = router.route(path, get(handle_get));
    }
    for path in POST_PATHS {
        router = router.route(path, post(handle_post));
    }
    router.with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn handle_get(
    State(state): State<MockState>,
    uri: Uri,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    state
        .record(RecordedRequest {
            method: "GET".to_string(),
            path: uri.path().to_string(),
            query: query.clone(),
            body: None,
        })
        .await;

    if let Some(rejection) = check_key(&state, &query) {
        return rejection;
    }
    if query.get("vin").map(String::as_str) == Some(NOT_FOUND_VIN) {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    }
    if query.get("code").map(String::as_str) == Some(RAW_OBD_CODE) {
        return (StatusCode::OK, "plain text, not json").into_response();
    }

    Json(json!({
        "success": true,
        "endpoint": uri.path(),
        "input": query,
    }))
    .into_response()
}

async fn handle_post(
    State(state): State<MockState>,
    uri: Uri,
    Query(query): Query<BTreeMap<String, String>>,
    Json(input): Json<ImageRequest>,
) -> Response {
    state
        .record(RecordedRequest {
            method: "POST".to_string(),
            path: uri.path().to_string(),
            query: query.clone(),
            body: Some(json!({ "image": input.image })),
        })
        .await;

    if let Some(rejection) = check_key(&state, &query) {
        return rejection;
    }

    Json(json!({
        "success": true,
        "endpoint": uri.path(),
        "input": query,
        "image": input.image,
    }))
    .into_response()
}

fn check_key(state: &MockState, query: &BTreeMap<String, String>) -> Option<Response> {
    match query.get("key") {
        Some(key) if key.as_str() == &*state.api_key => None,
        _ => Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "invalid API key" })),
            )
                .into_response(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_request_serializes_to_json() {
        let request = RecordedRequest {
            method: "GET".to_string(),
            path: "/specs".to_string(),
            query: BTreeMap::from([("vin".to_string(), "X".to_string())]),
            body: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "GET");
        assert_eq!(json["query"]["vin"], "X");
        assert!(json["body"].is_null());
    }

    #[test]
    fn image_request_rejects_missing_image() {
        let result: Result<ImageRequest, _> = serde_json::from_str(r#"{}"#);
        assert!(result.is_err());
    }

    #[test]
    fn image_request_reads_image() {
        let input: ImageRequest = serde_json::from_str(r#"{"image":"http://x/y.jpg"}"#).unwrap();
        assert_eq!(input.image, "http://x/y.jpg");
    }

    #[test]
    fn new_state_has_no_requests() {
        let state = MockState::new("k");
        assert!(state.requests_blocking().is_empty());
    }
}
