//! Host and path matching.
//!
//! # Responsibilities
//! - Match the Host header against a domain suffix (case-insensitive)
//! - Match the request path against a literal prefix (case-sensitive)
//!
//! # Design Decisions
//! - Host values are matched verbatim: a port suffix is part of the host
//! - No allocation and no regex on the hot path
//! - Byte-wise comparison, so non-ASCII hosts never split a char boundary

/// Matches hosts ending with a domain suffix, ignoring ASCII case.
#[derive(Debug, Clone)]
pub struct HostSuffixMatcher {
    suffix: String,
}

impl HostSuffixMatcher {
    /// Create a new suffix matcher.
    /// The suffix is stored lowercased; comparison ignores ASCII case anyway.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into().to_ascii_lowercase(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns true if `host` ends with the suffix.
    pub fn matches(&self, host: &str) -> bool {
        let host = host.as_bytes();
        let suffix = self.suffix.as_bytes();
        if suffix.is_empty() || host.len() < suffix.len() {
            return false;
        }
        host[host.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
    }
}

/// Matches paths starting with a literal prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}
