//! Forward requests to named backends.
//!
//! # Responsibilities
//! - Resolve a backend name through the registry
//! - Rewrite the request URI to the origin, keeping path and query
//! - Add the X-Forwarded-* headers the proxy protocol expects
//! - Enforce the upstream request timeout
//!
//! # Design Decisions
//! - The original Host header is kept; origins route on it
//! - Bodies are streamed, never buffered
//! - Registry is swapped atomically on config reload

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    http::{
        uri::{PathAndQuery, Scheme},
        HeaderMap, HeaderName, HeaderValue, Request, Uri,
    },
    response::Response,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::{BackendConfig, TimeoutConfig};
use crate::forward::error::ForwardError;
use crate::forward::registry::BackendRegistry;
use crate::observability::metrics;
use crate::routing::BackendName;

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Hands requests to registered origin backends.
pub struct Forwarder {
    registry: ArcSwap<BackendRegistry>,
    client: Client<HttpConnector, Body>,
    request_timeout: Duration,
}

impl Forwarder {
    pub fn new(backends: &[BackendConfig], timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            registry: ArcSwap::from_pointee(BackendRegistry::new(backends)),
            client,
            request_timeout: Duration::from_secs(timeouts.request_secs),
        }
    }

    /// Replace the backend registry.
    pub fn reload(&self, backends: &[BackendConfig]) {
        let registry = BackendRegistry::new(backends);
        tracing::info!(backends = registry.len(), "Backend registry reloaded");
        self.registry.store(Arc::new(registry));
    }

    /// Snapshot of the current registry.
    pub fn registry(&self) -> Arc<BackendRegistry> {
        self.registry.load_full()
    }

    /// Forward `request` to the backend named `backend`.
    pub async fn forward(
        &self,
        backend: &BackendName,
        request: Request<Body>,
        client_addr: Option<SocketAddr>,
        scheme: &str,
    ) -> Result<Response, ForwardError> {
        let start = Instant::now();
        let authority = self
            .registry
            .load()
            .get(backend.as_str())
            .cloned()
            .ok_or_else(|| ForwardError::UnknownBackend(backend.to_string()))?;

        tracing::info!(backend = %backend, origin = %authority, "handoff to backend");

        let (mut parts, body) = request.into_parts();
        parts.uri = upstream_uri(&parts.uri, authority)?;
        apply_forwarding_headers(&mut parts.headers, client_addr, scheme);
        let upstream = Request::from_parts(parts, body);

        let response = match tokio::time::timeout(self.request_timeout, self.client.request(upstream)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                metrics::record_forward(backend.as_str(), 502, start);
                return Err(ForwardError::Upstream(e));
            }
            Err(_) => {
                metrics::record_forward(backend.as_str(), 504, start);
                return Err(ForwardError::Timeout(self.request_timeout));
            }
        };

        metrics::record_forward(backend.as_str(), response.status().as_u16(), start);

        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Point `original` at the origin, keeping path and query.
fn upstream_uri(original: &Uri, authority: axum::http::uri::Authority) -> Result<Uri, ForwardError> {
    let mut parts = original.clone().into_parts();
    parts.scheme = Some(Scheme::HTTP);
    parts.authority = Some(authority);
    if parts.path_and_query.is_none() {
        parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    Uri::from_parts(parts).map_err(|e| ForwardError::InvalidUri(e.to_string()))
}

/// Add X-Forwarded-For and, for https requests, X-Forwarded-Proto.
pub fn apply_forwarding_headers(headers: &mut HeaderMap, client_addr: Option<SocketAddr>, scheme: &str) {
    if let Some(addr) = client_addr {
        if let Ok(value) = HeaderValue::from_str(&addr.ip().to_string()) {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }

    if scheme.eq_ignore_ascii_case("https") {
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("https"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_uri_keeps_path_and_query() {
        let original: Uri = "/stream/events?last=5".parse().unwrap();
        let uri = upstream_uri(&original, "10.0.0.1:8080".parse().unwrap()).unwrap();
        assert_eq!(uri.to_string(), "http://10.0.0.1:8080/stream/events?last=5");
    }

    #[test]
    fn test_upstream_uri_replaces_absolute_form() {
        let original: Uri = "https://foo.fanoutcdn.com/x".parse().unwrap();
        let uri = upstream_uri(&original, "origin.internal".parse().unwrap()).unwrap();
        assert_eq!(uri.to_string(), "http://origin.internal/x");
    }

    #[test]
    fn test_forwarding_headers_https() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("6.6.6.6"));
        let addr: SocketAddr = "192.0.2.7:51000".parse().unwrap();

        apply_forwarding_headers(&mut headers, Some(addr), "https");

        assert_eq!(headers.get(X_FORWARDED_FOR).unwrap(), "192.0.2.7");
        assert_eq!(headers.get(X_FORWARDED_PROTO).unwrap(), "https");
    }

    #[test]
    fn test_forwarding_headers_plain_http() {
        let mut headers = HeaderMap::new();
        apply_forwarding_headers(&mut headers, None, "http");
        assert!(headers.get(X_FORWARDED_FOR).is_none());
        assert!(headers.get(X_FORWARDED_PROTO).is_none());
    }

    #[tokio::test]
    async fn test_unknown_backend() {
        let forwarder = Forwarder::new(&[], &TimeoutConfig::default());
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let err = forwarder
            .forward(&BackendName::derive("https", "nowhere.com"), request, None, "https")
            .await
            .unwrap_err();
        assert!(matches!(err, ForwardError::UnknownBackend(ref n) if n == "https_backend_nowhere.com"));
    }

    #[test]
    fn test_reload_swaps_registry() {
        let forwarder = Forwarder::new(&[], &TimeoutConfig::default());
        assert!(forwarder.registry().is_empty());

        forwarder.reload(&[BackendConfig {
            name: "https_backend_a.com".into(),
            address: "127.0.0.1:9".into(),
        }]);
        assert_eq!(forwarder.registry().names(), vec!["https_backend_a.com"]);
    }
}
