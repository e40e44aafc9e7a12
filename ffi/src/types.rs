//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations: `*mut
//! c_char` instead of `String`, raw pointers instead of `Vec`, and tagged
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use carsxe_core::{ApiError, HttpMethod, HttpRequest, RequestBuilder};

/// Opaque handle to a `RequestBuilder`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiCarsxeClient {
    pub(crate) inner: RequestBuilder,
}

/// Copy `s` into a heap C string owned by the caller. Interior NULs are
/// dropped rather than failing.
pub(crate) fn to_c_string(s: impl Into<String>) -> *mut c_char {
    let mut s = s.into();
    s.retain(|c| c != '\0');
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A fully built request. `url` already contains the encoded query string,
/// including the API key. `body` is null for GET.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> Box<Self> {
        let body = match req.body {
            Some(b) => to_c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: to_c_string(req.url),
            headers,
            headers_len,
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller fills this in after executing an `FfiHttpRequest`. `url` is
/// the request URL and may be null; it is only used in error messages. The
/// FFI layer reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub url: *const c_char,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Config = 1,
    Validation = 2,
    UnknownEndpoint = 3,
    Request = 4,
    Parse = 5,
    Serialization = 6,
    Transport = 7,
    InvalidParams = 8,
    Panic = 9,
    NullArg = 10,
}

/// Tag that tells `carsxe_free_result` what `FfiResult::data` points to.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    /// `data` is an `FfiHttpRequest*`.
    Request = 1,
    /// `data` is a `char*` holding a JSON document.
    Json = 2,
}

/// Result envelope for every build and parse operation.
///
/// On success `error_code` is `Ok`, `error_message` is null and `data` points
/// to the payload named by `data_tag`. On failure `error_code` gives the
/// category, `error_message` is a C string and `data` is null. `http_status`
/// is set for `Request` errors.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiResult {
    fn new(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        data_tag: FfiDataTag,
        data: *mut std::ffi::c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message,
            http_status,
            data_tag,
            data,
        }))
    }

    pub(crate) fn ok_request(req: HttpRequest) -> *mut Self {
        let data = Box::into_raw(FfiHttpRequest::from_core(req)) as *mut std::ffi::c_void;
        Self::new(FfiErrorCode::Ok, std::ptr::null_mut(), 0, FfiDataTag::Request, data)
    }

    pub(crate) fn ok_json(value: serde_json::Value) -> *mut Self {
        let data = to_c_string(value.to_string()) as *mut std::ffi::c_void;
        Self::new(FfiErrorCode::Ok, std::ptr::null_mut(), 0, FfiDataTag::Json, data)
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status) = match &err {
            ApiError::Config(_) => (FfiErrorCode::Config, 0),
            ApiError::Validation { .. } => (FfiErrorCode::Validation, 0),
            ApiError::UnknownEndpoint(_) => (FfiErrorCode::UnknownEndpoint, 0),
            ApiError::Request { status, .. } => (FfiErrorCode::Request, *status),
            ApiError::Parse(_) => (FfiErrorCode::Parse, 0),
            ApiError::Serialization(_) => (FfiErrorCode::Serialization, 0),
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
        };
        Self::error(error_code, http_status, err.to_string())
    }

    pub(crate) fn invalid_params(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::InvalidParams, 0, format!("invalid params: {msg}"))
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg.to_string())
    }

    fn error(code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Self::new(code, to_c_string(msg), http_status, FfiDataTag::None, std::ptr::null_mut())
    }
}
