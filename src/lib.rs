//! Edge routing layer in front of the Fanout proxy.
//!
//! Every request is either answered by a built-in handler (`/test`,
//! `/bayeux` on Fanout hosts) or handed to a backend named
//! `{scheme}_backend_{host}`.

pub mod config;
pub mod forward;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::EdgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{route, BackendName, HandlerId, RequestRouter, RoutingDecision};
