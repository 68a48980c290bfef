//! Forwarding errors.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::response::json_error_response;

/// Why a forwarded request produced no upstream response.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("no backend registered under '{0}'")]
    UnknownBackend(String),

    #[error("invalid upstream URI: {0}")]
    InvalidUri(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

impl ForwardError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ForwardError::UnknownBackend(_) => "UNKNOWN_BACKEND",
            ForwardError::InvalidUri(_) => "INVALID_UPSTREAM_URI",
            ForwardError::Upstream(_) => "UPSTREAM_FAILED",
            ForwardError::Timeout(_) => "UPSTREAM_TIMEOUT",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ForwardError::UnknownBackend(_) => StatusCode::BAD_GATEWAY,
            ForwardError::InvalidUri(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ForwardError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ForwardError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        json_error_response(self.code(), self.status_code(), self.to_string())
    }
}
