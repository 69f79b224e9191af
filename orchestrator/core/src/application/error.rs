// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Service-level error taxonomy returned by every orchestrator.

use thiserror::Error;

use crate::domain::backend::{DriverError, UnsupportedBackend};
use crate::domain::repository::RepositoryError;
use crate::domain::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    UnsupportedBackend(String),

    /// The remote executor failed or could not be reached. Local metadata
    /// was left untouched.
    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("encryption error: {0}")]
    Encryption(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            RepositoryError::Validation(msg) => ServiceError::Validation(msg),
            RepositoryError::Encryption(msg) => ServiceError::Encryption(msg),
            RepositoryError::Database(msg) => ServiceError::Storage(msg),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Validation(err.0)
    }
}

impl From<UnsupportedBackend> for ServiceError {
    fn from(err: UnsupportedBackend) -> Self {
        ServiceError::UnsupportedBackend(err.to_string())
    }
}

impl From<DriverError> for ServiceError {
    fn from(err: DriverError) -> Self {
        match err {
            DriverError::NotImplemented { .. } => ServiceError::UnsupportedBackend(err.to_string()),
            DriverError::Upstream { .. } | DriverError::MalformedResponse { .. } => {
                ServiceError::Upstream(err.to_string())
            }
        }
    }
}
