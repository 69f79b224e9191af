// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Record validation primitives shared by every resource aggregate.

use std::net::IpAddr;
use thiserror::Error;

/// A request or record shape was malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Reject empty or whitespace-only values.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Host addresses must be literal IPv4/IPv6 addresses, never hostnames.
pub fn require_ip(field: &str, value: &str) -> Result<(), ValidationError> {
    value
        .parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| ValidationError(format!("{} '{}' is not a valid IP address", field, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("name", "d1").is_ok());
        assert!(require_non_empty("name", "   ").is_err());
    }

    #[test]
    fn test_require_ip_accepts_v4_and_v6() {
        assert!(require_ip("ip", "10.0.0.1").is_ok());
        assert!(require_ip("ip", "fe80::1").is_ok());
        assert!(require_ip("ip", "storage-01.local").is_err());
    }
}
