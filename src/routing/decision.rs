//! Routing decision types.
//!
//! A decision is produced once per request and consumed by the HTTP layer:
//! either a local handler runs, or the request is handed to a named backend.

use serde::Serialize;
use std::fmt;

/// Built-in handlers that terminate a request at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerId {
    /// Self-test endpoints under `/test`.
    Test,
    /// Bayeux endpoint under `/bayeux`.
    Bayeux,
}

impl HandlerId {
    /// Stable label used in logs, metrics and the `X-Edge-Handler` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerId::Test => "test",
            HandlerId::Bayeux => "bayeux",
        }
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a registered origin backend, `{scheme}_backend_{host}`.
///
/// The scheme is part of the name only; it says nothing about the transport
/// used to reach the origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BackendName(String);

impl BackendName {
    /// Separator between scheme and host.
    pub const INFIX: &'static str = "_backend_";

    /// Derive the backend name for a scheme and host, both used verbatim.
    pub fn derive(scheme: &str, host: &str) -> Self {
        let mut name = String::with_capacity(scheme.len() + Self::INFIX.len() + host.len());
        name.push_str(scheme);
        name.push_str(Self::INFIX);
        name.push_str(host);
        Self(name)
    }

    /// Prefix of the backend that loops a request back through Fanout.
    pub const SELF_PREFIX: &'static str = "self_";

    /// Backend that hands `host` back to Fanout, `self_{host}`.
    pub fn self_handoff(host: &str) -> Self {
        Self(format!("{}{}", Self::SELF_PREFIX, host))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackendName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BackendName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of routing a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RoutingDecision {
    /// Terminate the request with a built-in handler.
    Local { handler: HandlerId },
    /// Hand the request to the named backend through the proxy.
    Forward { backend: BackendName },
}

impl RoutingDecision {
    /// Short label for metrics ("local" or "forward").
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingDecision::Local { .. } => "local",
            RoutingDecision::Forward { .. } => "forward",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, RoutingDecision::Local { .. })
    }

    pub fn backend(&self) -> Option<&BackendName> {
        match self {
            RoutingDecision::Forward { backend } => Some(backend),
            RoutingDecision::Local { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_name_format() {
        let name = BackendName::derive("https", "example.com");
        assert_eq!(name.as_str(), "https_backend_example.com");
        assert_eq!(name.to_string(), "https_backend_example.com");
    }

    #[test]
    fn test_backend_name_keeps_port_and_case() {
        let name = BackendName::derive("https", "Example.com:8443");
        assert_eq!(name.as_str(), "https_backend_Example.com:8443");
    }

    #[test]
    fn test_backend_name_empty_host() {
        assert_eq!(BackendName::derive("https", "").as_str(), "https_backend_");
    }

    #[test]
    fn test_self_handoff_name() {
        assert_eq!(
            BackendName::self_handoff("foo.fanoutcdn.com:8443").as_str(),
            "self_foo.fanoutcdn.com:8443"
        );
    }

    #[test]
    fn test_decision_serialization() {
        let local = RoutingDecision::Local { handler: HandlerId::Bayeux };
        assert_eq!(
            serde_json::to_string(&local).unwrap(),
            r#"{"decision":"local","handler":"bayeux"}"#
        );

        let forward = RoutingDecision::Forward {
            backend: BackendName::derive("https", "a.com"),
        };
        assert_eq!(
            serde_json::to_string(&forward).unwrap(),
            r#"{"decision":"forward","backend":"https_backend_a.com"}"#
        );
    }

    #[test]
    fn test_decision_accessors() {
        let local = RoutingDecision::Local { handler: HandlerId::Test };
        assert!(local.is_local());
        assert_eq!(local.kind(), "local");
        assert!(local.backend().is_none());

        let forward = RoutingDecision::Forward {
            backend: BackendName::derive("http", "b.com"),
        };
        assert!(!forward.is_local());
        assert_eq!(forward.kind(), "forward");
        assert_eq!(forward.backend().map(|b| b.as_str()), Some("http_backend_b.com"));
    }
}
