// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};

use crate::domain::validation::{require_ip, require_non_empty, ValidationError};

/// A filesystem directory known to exist on a managed host.
///
/// Identity is the `(name, host_ip)` pair; the same directory name may exist
/// on any number of hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub name: String,
    pub host_ip: String,
}

impl Directory {
    pub fn new(name: impl Into<String>, host_ip: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host_ip: host_ip.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("directory name", &self.name)?;
        require_ip("directory host_ip", &self.host_ip)
    }
}
