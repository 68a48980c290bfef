//! GRIP and WebSocket-over-HTTP helpers.
//!
//! Fanout holds a connection open when the origin answers with `Grip-Hold`
//! and `Grip-Channel` headers. WebSocket-over-HTTP events are framed as
//! `TYPE <hex length>\r\n<payload>\r\n`.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Response,
};
use serde_json::json;

use crate::http::response::json_error_response;

pub const GRIP_HOLD: HeaderName = HeaderName::from_static("grip-hold");
pub const GRIP_CHANNEL: HeaderName = HeaderName::from_static("grip-channel");
pub const GRIP_KEEP_ALIVE: HeaderName = HeaderName::from_static("grip-keep-alive");
pub const GRIP_SIG: HeaderName = HeaderName::from_static("grip-sig");

/// Content type of WebSocket-over-HTTP bodies.
pub const WEBSOCKET_EVENTS: &str = "application/websocket-events";

/// Whether the request already passed through Fanout, which signs what it
/// proxies with `Grip-Sig`.
pub fn is_from_fanout(headers: &HeaderMap) -> bool {
    headers.contains_key(GRIP_SIG)
}

/// Response telling Fanout to hold the connection on `channel`.
pub fn grip_response(content_type: &'static str, hold: &'static str, channel: &str, body: impl Into<Body>) -> Response {
    let channel = match HeaderValue::from_str(channel) {
        Ok(value) => value,
        Err(_) => {
            tracing::error!(channel = %channel, "GRIP channel is not a valid header value");
            return json_error_response(
                "INVALID_CHANNEL",
                StatusCode::INTERNAL_SERVER_ERROR,
                "configured GRIP channel is not a valid header value",
            );
        }
    };

    let mut response = Response::new(body.into());
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(GRIP_HOLD, HeaderValue::from_static(hold));
    headers.insert(GRIP_CHANNEL, channel);
    response
}

/// Frame `msg` as a WebSocket-over-HTTP TEXT event.
pub fn ws_text(msg: &str) -> Vec<u8> {
    format!("TEXT {:02x}\r\n{}\r\n", msg.len(), msg).into_bytes()
}

/// Control message subscribing the connection to `channel`.
pub fn ws_sub(channel: &str) -> Vec<u8> {
    ws_control(json!({ "type": "subscribe", "channel": channel }))
}

/// Control message asking Fanout to ping the client every `timeout` seconds.
pub fn ws_keep_alive(timeout: u32) -> Vec<u8> {
    ws_control(json!({
        "type": "keep-alive",
        "message-type": "ping",
        "content": "",
        "timeout": timeout,
    }))
}

fn ws_control(message: serde_json::Value) -> Vec<u8> {
    ws_text(&format!("c:{}", message))
}
