// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Storage Driver Interface (Anti-Corruption Layer)
//!
//! Every storage-backend kind is reached through a [`StorageDriver`]
//! implementation exposing the same fixed capability set. Orchestrators
//! never special-case a backend; they resolve a driver from the registry by
//! the host's `storage_type` and call the capability.
//!
//! Implementations live in `crate::infrastructure::backend`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::account::{LocalUser, User};
use crate::domain::context::OperationContext;
use crate::domain::directory::Directory;
use crate::domain::share::Share;

/// Enumerated storage-backend kinds known at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Host runs a shareplane executor agent reached over HTTP.
    Agent,
    /// Dedicated storage appliance with its own management API.
    /// Extension point only: no operations are implemented yet.
    Appliance,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::Agent, BackendKind::Appliance];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Agent => "agent",
            BackendKind::Appliance => "appliance",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = UnsupportedBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agent" | "agent-executed" => Ok(BackendKind::Agent),
            "appliance" => Ok(BackendKind::Appliance),
            _ => Err(UnsupportedBackend(s.to_string())),
        }
    }
}

/// The storage-backend identifier is unknown or has no bound driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported storage backend '{0}'")]
pub struct UnsupportedBackend(pub String);

/// Host facts reported by an executor's system-info capability.
///
/// Executors report different subsets, so every field is optional and
/// anything unrecognised is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_bytes: Option<u64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Capability set every backend exposes.
#[async_trait]
pub trait StorageDriver: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn create_directory(&self, ctx: &OperationContext, directory: &Directory) -> Result<(), DriverError>;

    async fn delete_directory(&self, ctx: &OperationContext, directory: &Directory) -> Result<(), DriverError>;

    async fn create_cifs_share(&self, ctx: &OperationContext, share: &Share) -> Result<(), DriverError>;

    async fn delete_cifs_share(&self, ctx: &OperationContext, share: &Share) -> Result<(), DriverError>;

    async fn mount_share(&self, ctx: &OperationContext, share: &Share, mount_point: &str) -> Result<(), DriverError>;

    async fn unmount_share(&self, ctx: &OperationContext, share: &Share) -> Result<(), DriverError>;

    async fn create_local_user(&self, ctx: &OperationContext, user: &LocalUser) -> Result<(), DriverError>;

    async fn delete_local_user(&self, ctx: &OperationContext, user: &LocalUser) -> Result<(), DriverError>;

    async fn create_user(&self, ctx: &OperationContext, user: &User) -> Result<(), DriverError>;

    async fn delete_user(&self, ctx: &OperationContext, user: &User) -> Result<(), DriverError>;

    async fn get_system_info(&self, ctx: &OperationContext) -> Result<SystemInfo, DriverError>;
}

#[derive(Debug, Error)]
pub enum DriverError {
    /// The executor could not be reached or answered with a failure status.
    #[error("{operation} on {host} failed: {message}")]
    Upstream {
        host: String,
        operation: String,
        status: Option<u16>,
        message: String,
    },

    /// The executor answered successfully but the body was unusable.
    #[error("{operation} on {host} returned a malformed response: {message}")]
    MalformedResponse {
        host: String,
        operation: String,
        message: String,
    },

    /// The backend kind has no implementation for this capability.
    #[error("{operation} is not implemented for the '{backend}' backend")]
    NotImplemented {
        backend: BackendKind,
        operation: &'static str,
    },
}
