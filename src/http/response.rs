//! Response helpers.
//!
//! # Responsibilities
//! - Render edge errors as JSON bodies with an `X-Edge-Error` header
//! - Map forwarding failures to HTTP status codes
//!
//! # Design Decisions
//! - Upstream failures are 502, timeouts 504
//! - The error code is machine-readable; the message is for humans

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use serde::Serialize;

/// Header carrying the machine-readable error code.
pub const X_EDGE_ERROR: &str = "x-edge-error";

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// The error code, e.g. `UNKNOWN_BACKEND`.
    pub code: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// HTTP status code (for reference).
    pub status: u16,
}

impl ErrorResponse {
    pub fn new(code: &'static str, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: status.as_u16(),
        }
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"code":"{}","message":"{}","status":{}}}"#,
                self.code,
                self.message.replace('"', "\\\""),
                self.status
            )
        })
    }
}

/// Create a JSON error response with an `X-Edge-Error` header.
pub fn json_error_response(
    code: &'static str,
    status: StatusCode,
    message: impl Into<String>,
) -> Response {
    let body = ErrorResponse::new(code, status, message).to_json();

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(X_EDGE_ERROR, HeaderValue::from_static(code));
    response
}
