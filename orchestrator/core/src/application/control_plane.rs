// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Control Plane Assembly - Application Layer
//!
//! Wires the SQLite repositories, the secret codec and the backend registry
//! into the five resource orchestrators. The resulting [`ControlPlane`] owns
//! the single [`Database`] handle shared by every service.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Composition root for services, used by the CLI and tests

use anyhow::Context;
use std::sync::Arc;

use crate::application::directory_service::{DirectoryService, StandardDirectoryService};
use crate::application::host_service::{HostService, StandardHostService};
use crate::application::share_service::{ShareService, StandardShareService};
use crate::application::target::TargetResolver;
use crate::application::user_service::{
    LocalUserService, StandardLocalUserService, StandardUserService, UserService,
};
use crate::domain::config::ControlPlaneConfig;
use crate::domain::repository::{DirectoryRepository, HostRepository};
use crate::infrastructure::backend::BackendRegistry;
use crate::infrastructure::db::Database;
use crate::infrastructure::repositories::{
    SqliteDirectoryRepository, SqliteHostRepository, SqliteLocalUserRepository,
    SqliteShareRepository, SqliteUserRepository,
};
use crate::infrastructure::secret_codec::SecretCodec;

#[derive(Clone)]
pub struct ControlPlane {
    pub database: Database,
    pub hosts: Arc<dyn HostService>,
    pub directories: Arc<dyn DirectoryService>,
    pub shares: Arc<dyn ShareService>,
    pub local_users: Arc<dyn LocalUserService>,
    pub users: Arc<dyn UserService>,
}

impl ControlPlane {
    pub fn assemble(database: Database, codec: SecretCodec, backends: BackendRegistry) -> Self {
        let pool = database.get_pool().clone();

        let host_repo: Arc<dyn HostRepository> =
            Arc::new(SqliteHostRepository::new(pool.clone(), codec.clone()));
        let directory_repo: Arc<dyn DirectoryRepository> =
            Arc::new(SqliteDirectoryRepository::new(pool.clone()));
        let targets = TargetResolver::new(host_repo.clone(), Arc::new(backends));

        Self {
            hosts: Arc::new(StandardHostService::new(host_repo, targets.clone())),
            directories: Arc::new(StandardDirectoryService::new(
                directory_repo.clone(),
                targets.clone(),
            )),
            shares: Arc::new(StandardShareService::new(
                Arc::new(SqliteShareRepository::new(pool.clone())),
                directory_repo,
                targets.clone(),
            )),
            local_users: Arc::new(StandardLocalUserService::new(
                Arc::new(SqliteLocalUserRepository::new(pool.clone(), codec.clone())),
                targets.clone(),
            )),
            users: Arc::new(StandardUserService::new(
                Arc::new(SqliteUserRepository::new(pool, codec)),
                targets,
            )),
            database,
        }
    }

    /// Open the metadata store and build every service from configuration.
    /// Any failure here is fatal for the process.
    pub async fn from_config(config: &ControlPlaneConfig) -> anyhow::Result<Self> {
        let key = config
            .secrets
            .resolve_key()
            .context("Failed to resolve credential encryption key")?;
        let codec = SecretCodec::from_base64(&key)
            .context("secrets.key must be base64 of exactly 32 bytes")?;

        let backends = BackendRegistry::from_settings(&config.agent)
            .context("Failed to initialize backend registry")?;

        let database = Database::connect(&config.database)
            .await
            .with_context(|| format!("Failed to open metadata store at {}", config.database.url))?;

        Ok(Self::assemble(database, codec, backends))
    }

    pub async fn shutdown(&self) {
        self.database.close().await;
    }
}
