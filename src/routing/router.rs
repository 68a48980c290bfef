//! Route decision.
//!
//! # Responsibilities
//! - Decide between local handling and forwarding for each request
//! - Derive the backend name for forwarded requests
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Local handling requires both a Fanout host and a local path
//! - Local paths are checked in order: `/test` before `/bayeux`
//! - Total: every input produces exactly one decision

use std::sync::OnceLock;

use crate::routing::decision::{BackendName, HandlerId, RoutingDecision};
use crate::routing::matcher::{HostSuffixMatcher, PathPrefixMatcher};

/// Domain suffix served by the Fanout CDN.
pub const FANOUT_DOMAIN_SUFFIX: &str = ".fanoutcdn.com";

/// Path prefix of the self-test handler.
pub const TEST_PATH_PREFIX: &str = "/test";

/// Path prefix of the Bayeux handler.
pub const BAYEUX_PATH_PREFIX: &str = "/bayeux";

/// The routing-relevant view of an incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTarget<'a> {
    /// Raw Host header value (may include a port).
    pub host: &'a str,
    /// Request path, starting with `/` or empty.
    pub path: &'a str,
    /// Scheme reported for the request.
    pub scheme: &'a str,
}

impl<'a> RequestTarget<'a> {
    pub fn new(host: &'a str, path: &'a str, scheme: &'a str) -> Self {
        Self { host, path, scheme }
    }
}

/// Decides whether a request is handled at the edge or forwarded.
#[derive(Debug, Clone)]
pub struct RequestRouter {
    fanout_domain: HostSuffixMatcher,
    local_paths: [(PathPrefixMatcher, HandlerId); 2],
}

impl RequestRouter {
    /// Create a router for the given Fanout domain suffix.
    pub fn new(fanout_domain_suffix: impl Into<String>) -> Self {
        Self {
            fanout_domain: HostSuffixMatcher::new(fanout_domain_suffix),
            local_paths: [
                (PathPrefixMatcher::new(TEST_PATH_PREFIX), HandlerId::Test),
                (PathPrefixMatcher::new(BAYEUX_PATH_PREFIX), HandlerId::Bayeux),
            ],
        }
    }

    pub fn fanout_domain_suffix(&self) -> &str {
        self.fanout_domain.suffix()
    }

    /// Route a request.
    pub fn route(&self, target: &RequestTarget<'_>) -> RoutingDecision {
        let decision = self
            .local_handler(target)
            .map(|handler| RoutingDecision::Local { handler })
            .unwrap_or_else(|| RoutingDecision::Forward {
                backend: BackendName::derive(target.scheme, target.host),
            });

        tracing::debug!(
            host = %target.host,
            path = %target.path,
            scheme = %target.scheme,
            decision = ?decision,
            "Request routed"
        );

        decision
    }

    fn local_handler(&self, target: &RequestTarget<'_>) -> Option<HandlerId> {
        if !self.fanout_domain.matches(target.host) {
            return None;
        }
        self.local_paths
            .iter()
            .find(|(matcher, _)| matcher.matches(target.path))
            .map(|(_, handler)| *handler)
    }
}

impl Default for RequestRouter {
    fn default() -> Self {
        Self::new(FANOUT_DOMAIN_SUFFIX)
    }
}

/// Route with the default `.fanoutcdn.com` router.
pub fn route(host: &str, path: &str, scheme: &str) -> RoutingDecision {
    static DEFAULT: OnceLock<RequestRouter> = OnceLock::new();
    DEFAULT
        .get_or_init(RequestRouter::default)
        .route(&RequestTarget::new(host, path, scheme))
}
