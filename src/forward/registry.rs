//! Backend registry.
//!
//! # Responsibilities
//! - Map backend names to origin authorities
//! - Skip (and log) entries whose address cannot be used
//!
//! Names are matched exactly, including case and any port carried over from
//! the Host header.

use std::collections::HashMap;

use axum::http::uri::Authority;

use crate::config::BackendConfig;

/// Named origin backends known to the forwarder.
#[derive(Debug, Default, Clone)]
pub struct BackendRegistry {
    backends: HashMap<String, Authority>,
}

impl BackendRegistry {
    /// Build a registry from configuration.
    pub fn new(configs: &[BackendConfig]) -> Self {
        let mut backends = HashMap::with_capacity(configs.len());

        for config in configs {
            match config.address.parse::<Authority>() {
                Ok(authority) => {
                    if backends.insert(config.name.clone(), authority).is_some() {
                        tracing::warn!(name = %config.name, "Duplicate backend name, last entry wins");
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        name = %config.name,
                        address = %config.address,
                        error = %e,
                        "Invalid backend address, skipping"
                    );
                }
            }
        }

        Self { backends }
    }

    /// Look up a backend by name.
    pub fn get(&self, name: &str) -> Option<&Authority> {
        self.backends.get(name)
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.backends.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(name: &str, address: &str) -> BackendConfig {
        BackendConfig {
            name: name.into(),
            address: address.into(),
        }
    }

    #[test]
    fn test_lookup() {
        let registry = BackendRegistry::new(&[
            backend("https_backend_a.com", "10.0.0.1:8080"),
            backend("https_backend_b.com", "origin-b.internal"),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("https_backend_a.com").map(|a| a.as_str()),
            Some("10.0.0.1:8080")
        );
        assert_eq!(
            registry.get("https_backend_b.com").map(|a| a.host()),
            Some("origin-b.internal")
        );
        assert!(registry.get("https_backend_c.com").is_none());
        assert!(registry.get("HTTPS_BACKEND_A.COM").is_none());
    }

    #[test]
    fn test_invalid_address_skipped() {
        let registry = BackendRegistry::new(&[
            backend("good", "127.0.0.1:1"),
            backend("bad", "not a host"),
        ]);
        assert_eq!(registry.names(), vec!["good"]);
    }

    #[test]
    fn test_duplicate_last_wins() {
        let registry = BackendRegistry::new(&[
            backend("dup", "127.0.0.1:1"),
            backend("dup", "127.0.0.1:2"),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("dup").map(|a| a.port_u16()), Some(Some(2)));
    }

    #[test]
    fn test_empty() {
        assert!(BackendRegistry::default().is_empty());
    }
}
