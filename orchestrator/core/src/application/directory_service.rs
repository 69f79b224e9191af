// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Directory Orchestrator
//!
//! Create and delete dispatch to the owning host's executor first; the
//! metadata store is only touched once that call has succeeded.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::application::error::ServiceError;
use crate::application::target::TargetResolver;
use crate::domain::directory::Directory;
use crate::domain::query::{Page, QueryFilter};
use crate::domain::repository::DirectoryRepository;

#[async_trait]
pub trait DirectoryService: Send + Sync {
    async fn create(&self, directory: Directory) -> Result<Directory, ServiceError>;

    async fn delete(&self, name: &str, host_ip: &str) -> Result<(), ServiceError>;

    async fn get(&self, name: &str, host_ip: &str) -> Result<Directory, ServiceError>;

    async fn list(&self, filter: &QueryFilter) -> Result<Page<Directory>, ServiceError>;

    /// Drop matching metadata records without contacting any executor.
    async fn prune(&self, filter: &QueryFilter) -> Result<u64, ServiceError>;
}

pub struct StandardDirectoryService {
    repository: Arc<dyn DirectoryRepository>,
    targets: TargetResolver,
}

impl StandardDirectoryService {
    pub fn new(repository: Arc<dyn DirectoryRepository>, targets: TargetResolver) -> Self {
        Self { repository, targets }
    }
}

#[async_trait]
impl DirectoryService for StandardDirectoryService {
    async fn create(&self, directory: Directory) -> Result<Directory, ServiceError> {
        directory.validate()?;
        let target = self.targets.by_ip(&directory.host_ip).await?;

        if self
            .repository
            .find(&directory.name, &directory.host_ip)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "directory '{}' already exists on {}",
                directory.name, directory.host_ip
            )));
        }

        if let Err(e) = target.driver.create_directory(&target.ctx, &directory).await {
            error!(
                directory = %directory.name,
                host = %target.host.name,
                trace_id = %target.ctx.trace_id,
                error = %e,
                "Directory creation failed on executor"
            );
            return Err(e.into());
        }

        self.repository.insert(&directory).await?;
        info!(directory = %directory.name, host = %target.host.name, "Created directory");
        Ok(directory)
    }

    async fn delete(&self, name: &str, host_ip: &str) -> Result<(), ServiceError> {
        let target = self.targets.by_ip(host_ip).await?;
        let directory = self.get(name, host_ip).await?;

        if let Err(e) = target.driver.delete_directory(&target.ctx, &directory).await {
            error!(
                directory = %name,
                host = %target.host.name,
                trace_id = %target.ctx.trace_id,
                error = %e,
                "Directory deletion failed on executor; record kept"
            );
            return Err(e.into());
        }

        self.repository.delete(name, host_ip).await?;
        info!(directory = %name, host = %target.host.name, "Deleted directory");
        Ok(())
    }

    async fn get(&self, name: &str, host_ip: &str) -> Result<Directory, ServiceError> {
        self.repository
            .find(name, host_ip)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("directory '{}' on {}", name, host_ip)))
    }

    async fn list(&self, filter: &QueryFilter) -> Result<Page<Directory>, ServiceError> {
        Ok(self.repository.query(filter).await?)
    }

    async fn prune(&self, filter: &QueryFilter) -> Result<u64, ServiceError> {
        let removed = self.repository.delete_matching(filter).await?;
        info!(removed, "Pruned directory records");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Harness;

    #[tokio::test]
    async fn test_failed_delete_keeps_record() {
        let harness = Harness::with_host().await;
        let directories = &harness.plane.directories;
        directories.create(Directory::new("d1", "10.0.0.1")).await.unwrap();

        harness.dispatch.fail_on("directory/delete");
        let err = directories.delete("d1", "10.0.0.1").await.unwrap_err();
        assert!(matches!(err, ServiceError::Upstream(_)));
        assert!(directories.get("d1", "10.0.0.1").await.is_ok());

        harness.dispatch.succeed();
        directories.delete("d1", "10.0.0.1").await.unwrap();
        assert!(matches!(
            directories.get("d1", "10.0.0.1").await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_on_unknown_host_dispatches_nothing() {
        let harness = Harness::new().await;
        let err = harness
            .plane
            .directories
            .create(Directory::new("d1", "10.9.9.9"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(harness.dispatch.calls().is_empty());
    }
}
