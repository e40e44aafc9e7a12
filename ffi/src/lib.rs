//! C-ABI wrapper around `carsxe-core`.
//!
//! # Overview
//! Exposes the CarsXE request builder through `extern "C"` functions so any
//! language with a C FFI can build authenticated requests and parse responses
//! while doing the HTTP I/O itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Endpoints are named by string (`"specs"`, `"v2/marketvalue"`,
//!   `"plate_decoder"`, ...) instead of one function per endpoint.
//! - A single `FfiResult` envelope with `FfiDataTag` + `void* data` conveys
//!   built requests, parsed JSON and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `carsxe_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::str::Utf8Error;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use carsxe_core::{ClientConfig, Endpoint, HttpResponse, Params, RequestBuilder};

use types::*;

/// Borrow a C string as `&str`.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string that outlives
/// the returned reference.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Result<&'a str, Utf8Error> {
    unsafe { CStr::from_ptr(ptr) }.to_str()
}

/// Copy a C string, replacing invalid UTF-8 sequences. Null reads as empty.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
unsafe fn read_lossy(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// Decode a JSON object into request parameters. String values are taken as
/// is, numbers and booleans are stringified, nulls are skipped.
fn params_from_json(raw: &str) -> Result<Params, String> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    let object = value
        .as_object()
        .ok_or_else(|| "expected a JSON object".to_string())?;

    let mut params = Params::new();
    for (key, value) in object {
        let value = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            _ => return Err(format!("value for `{key}` must be a scalar")),
        };
        params.insert(key.clone(), value);
    }
    Ok(params)
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client for `api_key`. `base_url` may be null for the default.
///
/// Returns null if `api_key` is null or blank, if either string is not valid
/// UTF-8, or if an internal panic occurs.
/// The caller must free the returned pointer with `carsxe_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn carsxe_client_new(
    api_key: *const c_char,
    base_url: *const c_char,
) -> *mut FfiCarsxeClient {
    catch_unwind(|| {
        if api_key.is_null() {
            return std::ptr::null_mut();
        }
        let key = match unsafe { borrow_str(api_key) } {
            Ok(k) => k,
            Err(_) => return std::ptr::null_mut(),
        };
        let mut config = match ClientConfig::new(key) {
            Ok(c) => c,
            Err(_) => return std::ptr::null_mut(),
        };
        if !base_url.is_null() {
            match unsafe { borrow_str(base_url) } {
                Ok(url) => config = config.with_base_url(url),
                Err(_) => return std::ptr::null_mut(),
            }
        }
        let inner = RequestBuilder::new(config);
        Box::into_raw(Box::new(FfiCarsxeClient { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `carsxe_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn carsxe_client_free(client: *mut FfiCarsxeClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Build a request for `endpoint` from a JSON object of parameters.
///
/// `params_json` may be null, meaning no parameters. For the image endpoints
/// the URL is read from `imageUrl`. Returns a result with
/// `data_tag = Request` on success.
#[unsafe(no_mangle)]
pub extern "C" fn carsxe_build_request(
    client: *const FfiCarsxeClient,
    endpoint: *const c_char,
    params_json: *const c_char,
) -> *mut FfiResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if endpoint.is_null() {
            return FfiResult::null_arg("endpoint");
        }
        let client = unsafe { &*client };
        let endpoint: Endpoint = match unsafe { borrow_str(endpoint) } {
            Ok(name) => match name.parse() {
                Ok(e) => e,
                Err(e) => return FfiResult::from_error(e),
            },
            Err(e) => return FfiResult::invalid_params(&format!("endpoint: {e}")),
        };
        let params = if params_json.is_null() {
            Params::new()
        } else {
            let raw = match unsafe { borrow_str(params_json) } {
                Ok(raw) => raw,
                Err(e) => return FfiResult::invalid_params(&format!("params_json: {e}")),
            };
            match params_from_json(raw) {
                Ok(p) => p,
                Err(msg) => return FfiResult::invalid_params(&msg),
            }
        };
        match client.inner.build(endpoint, &params) {
            Ok(req) => FfiResult::ok_request(req),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in carsxe_build_request"))
}

/// Build a POST request for an image endpoint (`platerecognition` or
/// `v1/vinocr`). Returns a result with `data_tag = Request` on success.
#[unsafe(no_mangle)]
pub extern "C" fn carsxe_build_image_request(
    client: *const FfiCarsxeClient,
    endpoint: *const c_char,
    image_url: *const c_char,
) -> *mut FfiResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if endpoint.is_null() {
            return FfiResult::null_arg("endpoint");
        }
        let client = unsafe { &*client };
        let image_url = if image_url.is_null() {
            ""
        } else {
            match unsafe { borrow_str(image_url) } {
                Ok(url) => url,
                Err(e) => return FfiResult::invalid_params(&format!("image_url: {e}")),
            }
        };
        let name = match unsafe { borrow_str(endpoint) } {
            Ok(name) => name,
            Err(e) => return FfiResult::invalid_params(&format!("endpoint: {e}")),
        };
        let built = match name.parse::<Endpoint>() {
            Ok(Endpoint::PlateImageRecognition) => {
                client.inner.build_plate_image_recognition(image_url)
            }
            Ok(Endpoint::VinOcr) => client.inner.build_vin_ocr(image_url),
            Ok(other) => {
                return FfiResult::invalid_params(&format!("{other} is not an image endpoint"))
            }
            Err(e) => return FfiResult::from_error(e),
        };
        match built {
            Ok(req) => FfiResult::ok_request(req),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in carsxe_build_image_request"))
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

/// Response text is read lossily so an error body is never dropped.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> (String, HttpResponse) {
    let response = HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body: unsafe { read_lossy(resp.body) },
    };
    (unsafe { read_lossy(resp.url) }, response)
}

/// Parse the response to any request built by this library.
///
/// Returns a result with `data_tag = Json` on success; `data` is the JSON
/// document re-serialized as a C string.
#[unsafe(no_mangle)]
pub extern "C" fn carsxe_parse_response(
    client: *const FfiCarsxeClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let (url, core_resp) = ffi_response_to_core(unsafe { &*response });
        match client.inner.parse_response(&url, core_resp) {
            Ok(value) => FfiResult::ok_json(value),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in carsxe_parse_response"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

fn free_request(req: Box<FfiHttpRequest>) {
    if !req.url.is_null() {
        drop(unsafe { CString::from_raw(req.url) });
    }
    if !req.body.is_null() {
        drop(unsafe { CString::from_raw(req.body) });
    }
    if !req.headers.is_null() && req.headers_len > 0 {
        let headers: Box<[FfiHeader]> = unsafe {
            Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                req.headers,
                req.headers_len as usize,
            ))
        };
        for h in headers.iter() {
            if !h.key.is_null() {
                drop(unsafe { CString::from_raw(h.key) });
            }
            if !h.value.is_null() {
                drop(unsafe { CString::from_raw(h.value) });
            }
        }
    }
}

/// Free an `FfiResult` returned by any build or parse function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn carsxe_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data.is_null() {
            match result.data_tag {
                FfiDataTag::Request => {
                    free_request(unsafe { Box::from_raw(result.data as *mut FfiHttpRequest) });
                }
                FfiDataTag::Json => {
                    drop(unsafe { CString::from_raw(result.data as *mut c_char) });
                }
                FfiDataTag::None => {}
            }
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn carsxe_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
