//! Bayeux handler for `/bayeux` under Fanout hosts.
//!
//! Serves the Faye client scripts from `/bayeux/static/` and answers every
//! other path with a fixed, versioned placeholder.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::LocalConfig;
use crate::handlers::static_files;

const STATIC_PREFIX: &str = "/bayeux/static/";

/// Version of the placeholder contract.
pub const PLACEHOLDER_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct Placeholder {
    pub handler: &'static str,
    pub version: u32,
    pub path: String,
}

pub async fn handle(request: Request<Body>, config: &LocalConfig) -> Response {
    let path = request.uri().path();

    if path.starts_with(STATIC_PREFIX) {
        return static_files::serve(path, config.static_dir.as_deref()).await;
    }

    (
        StatusCode::OK,
        Json(Placeholder {
            handler: "bayeux",
            version: PLACEHOLDER_VERSION,
            path: path.to_string(),
        }),
    )
        .into_response()
}
