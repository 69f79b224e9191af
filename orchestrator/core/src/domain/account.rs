// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Account aggregates.
//!
//! - [`LocalUser`] lives on exactly one host and is addressed by host name.
//! - [`User`] is a centrally managed account provisioned through the
//!   executor of the host at `host_ip`.
//!
//! Both carry plaintext passwords in memory only; repositories encrypt on
//! write.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::validation::{require_ip, require_non_empty, ValidationError};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    pub name: String,
    pub password: String,
    pub host_name: String,
}

impl LocalUser {
    pub fn new(
        name: impl Into<String>,
        password: impl Into<String>,
        host_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            host_name: host_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("local user name", &self.name)?;
        require_non_empty("local user password", &self.password)?;
        require_non_empty("local user host_name", &self.host_name)
    }
}

impl fmt::Debug for LocalUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalUser")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("host_name", &self.host_name)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub password: String,
    pub host_ip: String,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        password: impl Into<String>,
        host_ip: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            host_ip: host_ip.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("user name", &self.name)?;
        require_non_empty("user password", &self.password)?;
        require_ip("user host_ip", &self.host_ip)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("host_ip", &self.host_ip)
            .finish()
    }
}
