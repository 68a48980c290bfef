//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::FANOUT_DOMAIN_SUFFIX;

/// Root configuration for the edge service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Routing decision settings.
    pub routing: RoutingConfig,

    /// Named origin backends requests can be forwarded to.
    pub backends: Vec<BackendConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Local handler settings.
    pub local: LocalConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Routing configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Host suffix whose `/test` and `/bayeux` paths are handled locally.
    pub fanout_domain_suffix: String,

    /// Scheme assumed when the request URI carries none.
    pub default_scheme: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            fanout_domain_suffix: FANOUT_DOMAIN_SUFFIX.to_string(),
            default_scheme: "https".to_string(),
        }
    }
}

/// A named origin backend.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BackendConfig {
    /// Backend name, e.g. "https_backend_example.com".
    pub name: String,

    /// Origin authority (e.g., "127.0.0.1:3000" or "origin.internal:80").
    pub address: String,
}

/// Timeout configuration for forwarded requests.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Local handler configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalConfig {
    /// GRIP channel used by the test stream endpoints.
    pub channel: String,

    /// Directory holding the static client scripts, if any.
    pub static_dir: Option<String>,

    /// Maximum request body read by a local handler, in bytes.
    pub max_body_bytes: usize,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            channel: "test".to_string(),
            static_dir: None,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Full,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: EdgeConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.routing.fanout_domain_suffix, ".fanoutcdn.com");
        assert_eq!(config.routing.default_scheme, "https");
        assert!(config.backends.is_empty());
        assert_eq!(config.local.channel, "test");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_full_config() {
        let config: EdgeConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [routing]
            default_scheme = "http"

            [[backends]]
            name = "https_backend_example.com"
            address = "10.0.0.1:80"

            [timeouts]
            request_secs = 10

            [local]
            static_dir = "/srv/static"

            [observability]
            log_format = "compact"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.routing.default_scheme, "http");
        assert_eq!(config.routing.fanout_domain_suffix, ".fanoutcdn.com");
        assert_eq!(
            config.backends,
            vec![BackendConfig {
                name: "https_backend_example.com".into(),
                address: "10.0.0.1:80".into(),
            }]
        );
        assert_eq!(config.timeouts.request_secs, 10);
        assert_eq!(config.timeouts.connect_secs, 5);
        assert_eq!(config.local.static_dir.as_deref(), Some("/srv/static"));
        assert_eq!(config.observability.log_format, LogFormat::Compact);
    }
}
