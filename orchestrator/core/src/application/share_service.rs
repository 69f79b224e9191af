// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Share Orchestrator
//!
//! CIFS share lifecycle plus mount/unmount. A share must be backed by a
//! known directory on the same host. Every mutation is dispatched first and
//! recorded only after the executor confirms it.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::application::error::ServiceError;
use crate::application::target::TargetResolver;
use crate::domain::query::{Page, QueryFilter};
use crate::domain::repository::{DirectoryRepository, ShareRepository};
use crate::domain::share::Share;
use crate::domain::validation::require_non_empty;

#[async_trait]
pub trait ShareService: Send + Sync {
    async fn create(&self, share: Share) -> Result<Share, ServiceError>;

    async fn delete(&self, name: &str) -> Result<(), ServiceError>;

    /// Mount an existing share and record where it was mounted.
    async fn mount(&self, name: &str, mount_point: &str) -> Result<Share, ServiceError>;

    async fn unmount(&self, name: &str) -> Result<Share, ServiceError>;

    async fn get(&self, name: &str) -> Result<Share, ServiceError>;

    async fn list(&self, filter: &QueryFilter) -> Result<Page<Share>, ServiceError>;

    async fn prune(&self, filter: &QueryFilter) -> Result<u64, ServiceError>;
}

pub struct StandardShareService {
    repository: Arc<dyn ShareRepository>,
    directories: Arc<dyn DirectoryRepository>,
    targets: TargetResolver,
}

impl StandardShareService {
    pub fn new(
        repository: Arc<dyn ShareRepository>,
        directories: Arc<dyn DirectoryRepository>,
        targets: TargetResolver,
    ) -> Self {
        Self {
            repository,
            directories,
            targets,
        }
    }
}

#[async_trait]
impl ShareService for StandardShareService {
    async fn create(&self, mut share: Share) -> Result<Share, ServiceError> {
        share.validate()?;
        share.mount_point = None;
        let target = self.targets.by_ip(&share.host_ip).await?;

        if self
            .directories
            .find(&share.directory_name, &share.host_ip)
            .await?
            .is_none()
        {
            return Err(ServiceError::NotFound(format!(
                "directory '{}' on {} backing share '{}'",
                share.directory_name, share.host_ip, share.name
            )));
        }
        if self.repository.find_by_name(&share.name).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "share '{}' already exists",
                share.name
            )));
        }

        if let Err(e) = target.driver.create_cifs_share(&target.ctx, &share).await {
            error!(
                share = %share.name,
                host = %target.host.name,
                trace_id = %target.ctx.trace_id,
                error = %e,
                "Share creation failed on executor"
            );
            return Err(e.into());
        }

        self.repository.insert(&share).await?;
        info!(share = %share.name, host = %target.host.name, "Created share");
        Ok(share)
    }

    async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        let share = self.get(name).await?;
        let target = self.targets.by_ip(&share.host_ip).await?;

        if let Err(e) = target.driver.delete_cifs_share(&target.ctx, &share).await {
            error!(
                share = %name,
                host = %target.host.name,
                trace_id = %target.ctx.trace_id,
                error = %e,
                "Share deletion failed on executor; record kept"
            );
            return Err(e.into());
        }

        self.repository.delete(name).await?;
        info!(share = %name, host = %target.host.name, "Deleted share");
        Ok(())
    }

    async fn mount(&self, name: &str, mount_point: &str) -> Result<Share, ServiceError> {
        require_non_empty("mount point", mount_point)?;
        let mut share = self.get(name).await?;
        if let Some(current) = share.mount_point.as_deref().filter(|m| !m.is_empty()) {
            return Err(ServiceError::Conflict(format!(
                "share '{}' is already mounted at {}",
                name, current
            )));
        }
        let target = self.targets.by_ip(&share.host_ip).await?;

        if let Err(e) = target.driver.mount_share(&target.ctx, &share, mount_point).await {
            error!(share = %name, mount_point, trace_id = %target.ctx.trace_id, error = %e, "Mount failed on executor");
            return Err(e.into());
        }

        self.repository.set_mount_point(name, Some(mount_point)).await?;
        share.mount_point = Some(mount_point.to_string());
        info!(share = %name, mount_point, "Mounted share");
        Ok(share)
    }

    async fn unmount(&self, name: &str) -> Result<Share, ServiceError> {
        let mut share = self.get(name).await?;
        if !share.is_mounted() {
            return Err(ServiceError::Validation(format!("share '{}' is not mounted", name)));
        }
        let target = self.targets.by_ip(&share.host_ip).await?;

        if let Err(e) = target.driver.unmount_share(&target.ctx, &share).await {
            error!(share = %name, trace_id = %target.ctx.trace_id, error = %e, "Unmount failed on executor");
            return Err(e.into());
        }

        self.repository.set_mount_point(name, None).await?;
        share.mount_point = None;
        info!(share = %name, "Unmounted share");
        Ok(share)
    }

    async fn get(&self, name: &str) -> Result<Share, ServiceError> {
        self.repository
            .find_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("share '{}'", name)))
    }

    async fn list(&self, filter: &QueryFilter) -> Result<Page<Share>, ServiceError> {
        Ok(self.repository.query(filter).await?)
    }

    async fn prune(&self, filter: &QueryFilter) -> Result<u64, ServiceError> {
        let removed = self.repository.delete_matching(filter).await?;
        info!(removed, "Pruned share records");
        Ok(removed)
    }
}
