// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contracts for each record shape, following the DDD Repository
//! pattern: one repository per aggregate, interface defined in the domain
//! layer, implemented in `crate::infrastructure::repositories`.
//!
//! | Trait | Aggregate | Identity |
//! |-------|-----------|----------|
//! | `HostRepository` | `Host` | `name` and `ip`, each unique |
//! | `DirectoryRepository` | `Directory` | `(name, host_ip)` |
//! | `ShareRepository` | `Share` | `name` |
//! | `LocalUserRepository` | `LocalUser` | `name` |
//! | `UserRepository` | `User` | `name` |
//!
//! Inserts never overwrite: a uniqueness violation is reported as
//! [`RepositoryError::Conflict`]. `query` accepts pagination; `delete_matching`
//! does not. Credential fields are handed to and returned from repositories
//! in plaintext; encryption at rest is the implementation's concern.

use async_trait::async_trait;

use crate::domain::account::{LocalUser, User};
use crate::domain::directory::Directory;
use crate::domain::host::Host;
use crate::domain::query::{Page, QueryFilter};
use crate::domain::share::Share;

#[async_trait]
pub trait HostRepository: Send + Sync {
    async fn insert(&self, host: &Host) -> Result<(), RepositoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Host>, RepositoryError>;

    async fn find_by_ip(&self, ip: &str) -> Result<Option<Host>, RepositoryError>;

    /// Look a host up by name first, then by IP.
    async fn find_by_name_or_ip(&self, key: &str) -> Result<Option<Host>, RepositoryError> {
        if let Some(host) = self.find_by_name(key).await? {
            return Ok(Some(host));
        }
        self.find_by_ip(key).await
    }

    async fn query(&self, filter: &QueryFilter) -> Result<Page<Host>, RepositoryError>;

    async fn list_all(&self) -> Result<Vec<Host>, RepositoryError>;

    /// Remove by name. `NotFound` if no such host.
    async fn delete(&self, name: &str) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn insert(&self, directory: &Directory) -> Result<(), RepositoryError>;

    async fn find(&self, name: &str, host_ip: &str) -> Result<Option<Directory>, RepositoryError>;

    async fn query(&self, filter: &QueryFilter) -> Result<Page<Directory>, RepositoryError>;

    async fn delete(&self, name: &str, host_ip: &str) -> Result<(), RepositoryError>;

    async fn delete_matching(&self, filter: &QueryFilter) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait ShareRepository: Send + Sync {
    async fn insert(&self, share: &Share) -> Result<(), RepositoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Share>, RepositoryError>;

    /// Record (or clear, with `None`) the share's mount point.
    async fn set_mount_point(&self, name: &str, mount_point: Option<&str>) -> Result<(), RepositoryError>;

    async fn query(&self, filter: &QueryFilter) -> Result<Page<Share>, RepositoryError>;

    async fn delete(&self, name: &str) -> Result<(), RepositoryError>;

    async fn delete_matching(&self, filter: &QueryFilter) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait LocalUserRepository: Send + Sync {
    async fn insert(&self, user: &LocalUser) -> Result<(), RepositoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<LocalUser>, RepositoryError>;

    async fn query(&self, filter: &QueryFilter) -> Result<Page<LocalUser>, RepositoryError>;

    async fn delete(&self, name: &str) -> Result<(), RepositoryError>;

    async fn delete_matching(&self, filter: &QueryFilter) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, RepositoryError>;

    async fn query(&self, filter: &QueryFilter) -> Result<Page<User>, RepositoryError>;

    async fn delete(&self, name: &str) -> Result<(), RepositoryError>;

    async fn delete_matching(&self, filter: &QueryFilter) -> Result<u64, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid query: {0}")]
    Validation(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("Row not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(db_err.message().to_string())
            }
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

impl From<crate::domain::validation::ValidationError> for RepositoryError {
    fn from(err: crate::domain::validation::ValidationError) -> Self {
        RepositoryError::Validation(err.0)
    }
}
