//! Request handling.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID when the client sent none
//! - Extract the routing-relevant parts (host, path, scheme)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Host is taken verbatim from the Host header (port included), falling
//!   back to the URI authority (HTTP/2), else empty. Non-ASCII bytes do not
//!   blank the host.
//! - Scheme comes from the URI when absolute, else the configured default

use axum::http::{header, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::routing::RequestTarget;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request ID header value, or "unknown".
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Owned routing target, extracted before the request is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingParts {
    pub host: String,
    pub path: String,
    pub scheme: String,
}

impl RoutingParts {
    /// Extract host, path and scheme from a request.
    pub fn from_request<B>(request: &Request<B>, default_scheme: &str) -> Self {
        let uri = request.uri();

        // obs-text bytes in Host are kept; only invalid UTF-8 is replaced
        let host = match request.headers().get(header::HOST) {
            Some(h) => String::from_utf8_lossy(h.as_bytes()).into_owned(),
            None => uri
                .authority()
                .map(|a| a.as_str().to_string())
                .unwrap_or_default(),
        };

        Self {
            host,
            path: uri.path().to_string(),
            scheme: uri.scheme_str().unwrap_or(default_scheme).to_string(),
        }
    }

    pub fn as_target(&self) -> RequestTarget<'_> {
        RequestTarget::new(&self.host, &self.path, &self.scheme)
    }
}
