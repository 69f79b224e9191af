// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! SQLite-backed implementations of the repository traits defined in
//! [`crate::domain::repository`].
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and retrieve domain aggregates
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! Every list and prune path goes through the generic engine in
//! [`crate::infrastructure::store`]. Credential columns are encrypted with
//! the shared [`SecretCodec`] before they reach SQL and decrypted on the way
//! out; a password column projected out of a query stays empty.

pub mod sqlite_account;
pub mod sqlite_directory;
pub mod sqlite_host;
pub mod sqlite_share;

pub use sqlite_account::{SqliteLocalUserRepository, SqliteUserRepository};
pub use sqlite_directory::SqliteDirectoryRepository;
pub use sqlite_host::SqliteHostRepository;
pub use sqlite_share::SqliteShareRepository;

use crate::domain::repository::RepositoryError;
use crate::infrastructure::secret_codec::SecretCodec;

/// Replace the raw constraint text of a uniqueness violation with a message
/// naming the record. Other errors pass through untouched.
pub(crate) fn describe_conflict(
    err: RepositoryError,
    describe: impl FnOnce(&str) -> String,
) -> RepositoryError {
    match err {
        RepositoryError::Conflict(raw) => RepositoryError::Conflict(describe(&raw)),
        other => other,
    }
}

pub(crate) fn reveal(codec: &SecretCodec, stored: String) -> Result<String, RepositoryError> {
    if stored.is_empty() {
        return Ok(stored);
    }
    Ok(codec.decrypt(&stored)?)
}
