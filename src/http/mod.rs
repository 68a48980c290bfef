//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, extract host/path/scheme)
//!     → routing (Local or Forward decision)
//!     → handlers (local response) | forward (upstream response)
//!     → response.rs (error rendering)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RoutingParts, X_REQUEST_ID};
pub use server::HttpServer;
