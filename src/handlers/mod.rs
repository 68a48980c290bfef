//! Built-in handlers for requests the router keeps at the edge.
//!
//! # Data Flow
//! ```text
//! Local { handler } decision
//!     → self_test.rs (greeting, GRIP stream, WebSocket-over-HTTP)
//!     → bayeux.rs (versioned placeholder)
//!     → static_files.rs (client scripts for both)
//!     → response tagged with X-Edge-Handler
//! ```

pub mod bayeux;
pub mod grip;
pub mod static_files;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    response::Response,
};

use crate::config::LocalConfig;
use crate::routing::HandlerId;

pub const X_EDGE_HANDLER: HeaderName = HeaderName::from_static("x-edge-handler");

/// Run the local handler selected by the router.
pub async fn handle(handler: HandlerId, request: Request<Body>, config: &LocalConfig) -> Response {
    let mut response = match handler {
        HandlerId::Test => self_test::handle(request, config).await,
        HandlerId::Bayeux => bayeux::handle(request, config).await,
    };
    response
        .headers_mut()
        .insert(X_EDGE_HANDLER, HeaderValue::from_static(handler.as_str()));
    response
}
