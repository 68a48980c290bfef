//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Forward { backend } decision
//!     → registry.rs (backend name → origin authority)
//!     → forwarder.rs (URI rewrite, X-Forwarded-*, upstream call)
//!     → upstream response, or ForwardError rendered as JSON
//! ```

pub mod error;
pub mod forwarder;
pub mod registry;

pub use error::ForwardError;
pub use forwarder::Forwarder;
pub use registry::BackendRegistry;
