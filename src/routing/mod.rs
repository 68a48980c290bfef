//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, scheme)
//!     → router.rs (Fanout domain + local path check)
//!     → matcher.rs (suffix / prefix evaluation)
//!     → Return: Local { handler } or Forward { backend }
//! ```
//!
//! # Design Decisions
//! - Pure function of the request target: no I/O, no shared mutable state
//! - Deterministic: same input always yields the same decision
//! - Malformed input (empty host) falls through to forwarding

pub mod decision;
pub mod matcher;
pub mod router;

pub use decision::{BackendName, HandlerId, RoutingDecision};
pub use router::{route, RequestRouter, RequestTarget, FANOUT_DOMAIN_SUFFIX};
