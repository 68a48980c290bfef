//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, backend names and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::{uri::Authority, HeaderValue};
use thiserror::Error;

use crate::config::schema::EdgeConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("fanout_domain_suffix must be non-empty and start with '.', got '{0}'")]
    InvalidDomainSuffix(String),

    #[error("default_scheme must not be empty")]
    EmptyScheme,

    #[error("backend #{0} has an empty name")]
    EmptyBackendName(usize),

    #[error("duplicate backend name '{0}'")]
    DuplicateBackend(String),

    #[error("backend '{name}' has invalid address '{address}'")]
    InvalidBackendAddress { name: String, address: String },

    #[error("local.channel must be a non-empty header value, got '{0}'")]
    InvalidChannel(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let suffix = &config.routing.fanout_domain_suffix;
    if suffix.len() < 2 || !suffix.starts_with('.') {
        errors.push(ValidationError::InvalidDomainSuffix(suffix.clone()));
    }

    if config.routing.default_scheme.is_empty() {
        errors.push(ValidationError::EmptyScheme);
    }

    let mut seen = HashSet::new();
    for (i, backend) in config.backends.iter().enumerate() {
        if backend.name.is_empty() {
            errors.push(ValidationError::EmptyBackendName(i));
        } else if !seen.insert(backend.name.as_str()) {
            errors.push(ValidationError::DuplicateBackend(backend.name.clone()));
        }

        if backend.address.parse::<Authority>().is_err() {
            errors.push(ValidationError::InvalidBackendAddress {
                name: backend.name.clone(),
                address: backend.address.clone(),
            });
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.local.channel.is_empty() || HeaderValue::from_str(&config.local.channel).is_err() {
        errors.push(ValidationError::InvalidChannel(config.local.channel.clone()));
    }
    if config.local.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("local.max_body_bytes"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
