// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Host Aggregate
//!
//! A registered remote machine together with the credentials used to reach
//! its executor and the storage-backend kind that decides which driver
//! handles its operations.
//!
//! Identity is dual-keyed: `name` and `ip` are each independently unique in
//! the metadata store. The password held here is always plaintext; the
//! repository encrypts it on write and decrypts it on read-back.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::validation::{require_ip, require_non_empty, ValidationError};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub name: String,
    pub ip: String,
    pub username: String,
    pub password: String,
    /// Backend identifier, e.g. `agent`. Resolved through the backend registry.
    pub storage_type: String,
}

impl Host {
    pub fn new(
        name: impl Into<String>,
        ip: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        storage_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ip: ip.into(),
            username: username.into(),
            password: password.into(),
            storage_type: storage_type.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("host name", &self.name)?;
        require_ip("host ip", &self.ip)?;
        require_non_empty("host username", &self.username)?;
        require_non_empty("host password", &self.password)?;
        require_non_empty("host storage_type", &self.storage_type)?;
        Ok(())
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("name", &self.name)
            .field("ip", &self.ip)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("storage_type", &self.storage_type)
            .finish()
    }
}
