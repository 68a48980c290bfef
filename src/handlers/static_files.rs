//! Static client scripts served under `/test/static/` and `/bayeux/static/`.
//!
//! Only the last path segment names the file, so requests cannot leave the
//! configured directory.

use std::io::ErrorKind;
use std::path::Path;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Content type by file extension.
pub fn content_type(name: &str) -> &'static str {
    if name.ends_with(".js") {
        "application/javascript"
    } else if name.ends_with(".map") {
        "application/octet-stream"
    } else {
        "text/plain"
    }
}

/// Serve the file named by the last segment of `path` from `static_dir`.
pub async fn serve(path: &str, static_dir: Option<&str>) -> Response {
    let Some(dir) = static_dir else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let name = path.rsplit('/').next().unwrap_or_default();
    if name.is_empty() || name == "." || name == ".." || name.contains('\\') {
        return StatusCode::NOT_FOUND.into_response();
    }

    match tokio::fs::read(Path::new(dir).join(name)).await {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type(name)));
            response
        }
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(file = %name, error = %e, "Failed to read static file");
            }
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("faye-browser.js"), "application/javascript");
        assert_eq!(content_type("faye-browser-min.js.map"), "application/octet-stream");
        assert_eq!(content_type("README"), "text/plain");
    }

    #[tokio::test]
    async fn test_serve_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("json2.js"), "var JSON2;").unwrap();
        let dir_str = dir.path().to_str().unwrap();

        let response = serve("/test/static/json2.js", Some(dir_str)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/javascript"
        );
        assert_eq!(body_of(response).await, b"var JSON2;");
    }

    #[tokio::test]
    async fn test_missing_file_and_dir() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();

        let response = serve("/bayeux/static/nope.js", Some(dir_str)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = serve("/bayeux/static/json2.js", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_refused() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();

        for path in ["/test/static/..", "/test/static/", "/test/static/..\\secret"] {
            let response = serve(path, Some(dir_str)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "path {path}");
        }
    }
}
