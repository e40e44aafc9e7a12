//! Host-does-IO round-trip through the C ABI against the live mock server.
//!
//! Builds requests with `carsxe_build_*`, executes them with ureq as a foreign
//! host would, and feeds the responses back through `carsxe_parse_response`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use carsxe_ffi::types::{FfiDataTag, FfiErrorCode, FfiHttpMethod, FfiHttpRequest, FfiHttpResponse, FfiResult};
use carsxe_ffi::{
    carsxe_build_image_request, carsxe_build_request, carsxe_client_free, carsxe_client_new,
    carsxe_free_result, carsxe_parse_response,
};
use mock_server::MockState;

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, MockState::new("test-key")).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn c_str(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
}

/// Execute the request in a build result, returning (url, status, body).
fn execute(result: *mut FfiResult) -> (String, u16, String) {
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    assert_eq!(r.data_tag, FfiDataTag::Request);
    let req = unsafe { &*(r.data as *const FfiHttpRequest) };
    let url = c_str(req.url);

    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let mut response = match req.method {
        FfiHttpMethod::Get => agent.get(&url).call(),
        FfiHttpMethod::Post => agent
            .post(&url)
            .content_type("application/json")
            .send(c_str(req.body).as_bytes()),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    (url, status, body)
}

fn parse(client: *const carsxe_ffi::types::FfiCarsxeClient, url: &str, status: u16, body: &str) -> *mut FfiResult {
    let url = CString::new(url).unwrap();
    let body = CString::new(body).unwrap();
    let resp = FfiHttpResponse {
        status,
        url: url.as_ptr(),
        body: body.as_ptr(),
    };
    carsxe_parse_response(client, &resp)
}

#[test]
fn specs_round_trip() {
    let base = CString::new(start_server()).unwrap();
    let key = CString::new("test-key").unwrap();
    let client = carsxe_client_new(key.as_ptr(), base.as_ptr());

    let endpoint = CString::new("specs").unwrap();
    let params = CString::new(r#"{"vin":"ABC 123"}"#).unwrap();
    let built = carsxe_build_request(client, endpoint.as_ptr(), params.as_ptr());
    let (url, status, body) = execute(built);
    carsxe_free_result(built);

    let parsed = parse(client, &url, status, &body);
    let r = unsafe { &*parsed };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    let json: serde_json::Value = serde_json::from_str(&c_str(r.data as *const c_char)).unwrap();
    assert_eq!(json["input"]["vin"], "ABC 123");
    assert_eq!(json["input"]["source"], "rust");

    carsxe_free_result(parsed);
    carsxe_client_free(client);
}

#[test]
fn not_found_round_trip() {
    let base = CString::new(start_server()).unwrap();
    let key = CString::new("test-key").unwrap();
    let client = carsxe_client_new(key.as_ptr(), base.as_ptr());

    let endpoint = CString::new("v2/marketvalue").unwrap();
    let params = CString::new(r#"{"vin":"NOTFOUND"}"#).unwrap();
    let built = carsxe_build_request(client, endpoint.as_ptr(), params.as_ptr());
    let (url, status, body) = execute(built);
    carsxe_free_result(built);

    let parsed = parse(client, &url, status, &body);
    let r = unsafe { &*parsed };
    assert_eq!(r.error_code, FfiErrorCode::Request);
    assert_eq!(r.http_status, 404);

    carsxe_free_result(parsed);
    carsxe_client_free(client);
}

#[test]
fn vin_ocr_round_trip() {
    let base = CString::new(start_server()).unwrap();
    let key = CString::new("test-key").unwrap();
    let client = carsxe_client_new(key.as_ptr(), base.as_ptr());

    let endpoint = CString::new("v1/vinocr").unwrap();
    let image = CString::new("http://x/vin.jpg").unwrap();
    let built = carsxe_build_image_request(client, endpoint.as_ptr(), image.as_ptr());
    let (url, status, body) = execute(built);
    carsxe_free_result(built);

    let parsed = parse(client, &url, status, &body);
    let r = unsafe { &*parsed };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    let json: serde_json::Value = serde_json::from_str(&c_str(r.data as *const c_char)).unwrap();
    assert_eq!(json["image"], "http://x/vin.jpg");

    carsxe_free_result(parsed);
    carsxe_client_free(client);
}
