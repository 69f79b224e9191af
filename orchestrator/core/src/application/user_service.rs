// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Account Orchestrators
//!
//! - [`LocalUserService`]: accounts local to one host, addressed by host name
//! - [`UserService`]: centrally managed accounts, addressed by host IP
//!
//! Passwords are handed to the executor in plaintext over the dispatch
//! transport and sealed by the repository before they are stored.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::application::error::ServiceError;
use crate::application::target::TargetResolver;
use crate::domain::account::{LocalUser, User};
use crate::domain::query::{Page, QueryFilter};
use crate::domain::repository::{LocalUserRepository, UserRepository};

#[async_trait]
pub trait LocalUserService: Send + Sync {
    async fn create(&self, user: LocalUser) -> Result<(), ServiceError>;

    async fn delete(&self, name: &str) -> Result<(), ServiceError>;

    async fn get(&self, name: &str) -> Result<LocalUser, ServiceError>;

    async fn list(&self, filter: &QueryFilter) -> Result<Page<LocalUser>, ServiceError>;

    async fn prune(&self, filter: &QueryFilter) -> Result<u64, ServiceError>;
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn create(&self, user: User) -> Result<(), ServiceError>;

    async fn delete(&self, name: &str) -> Result<(), ServiceError>;

    async fn get(&self, name: &str) -> Result<User, ServiceError>;

    async fn list(&self, filter: &QueryFilter) -> Result<Page<User>, ServiceError>;

    async fn prune(&self, filter: &QueryFilter) -> Result<u64, ServiceError>;
}

pub struct StandardLocalUserService {
    repository: Arc<dyn LocalUserRepository>,
    targets: TargetResolver,
}

impl StandardLocalUserService {
    pub fn new(repository: Arc<dyn LocalUserRepository>, targets: TargetResolver) -> Self {
        Self { repository, targets }
    }
}

#[async_trait]
impl LocalUserService for StandardLocalUserService {
    async fn create(&self, user: LocalUser) -> Result<(), ServiceError> {
        user.validate()?;
        let target = self.targets.by_name(&user.host_name).await?;

        if self.repository.find_by_name(&user.name).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "local user '{}' already exists",
                user.name
            )));
        }

        if let Err(e) = target.driver.create_local_user(&target.ctx, &user).await {
            error!(user = %user.name, host = %target.host.name, trace_id = %target.ctx.trace_id, error = %e, "Local user creation failed on executor");
            return Err(e.into());
        }

        self.repository.insert(&user).await?;
        info!(user = %user.name, host = %target.host.name, "Created local user");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        let user = self.get(name).await?;
        let target = self.targets.by_name(&user.host_name).await?;

        if let Err(e) = target.driver.delete_local_user(&target.ctx, &user).await {
            error!(user = %name, host = %target.host.name, trace_id = %target.ctx.trace_id, error = %e, "Local user deletion failed on executor; record kept");
            return Err(e.into());
        }

        self.repository.delete(name).await?;
        info!(user = %name, host = %target.host.name, "Deleted local user");
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<LocalUser, ServiceError> {
        self.repository
            .find_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("local user '{}'", name)))
    }

    async fn list(&self, filter: &QueryFilter) -> Result<Page<LocalUser>, ServiceError> {
        Ok(self.repository.query(filter).await?)
    }

    async fn prune(&self, filter: &QueryFilter) -> Result<u64, ServiceError> {
        Ok(self.repository.delete_matching(filter).await?)
    }
}

pub struct StandardUserService {
    repository: Arc<dyn UserRepository>,
    targets: TargetResolver,
}

impl StandardUserService {
    pub fn new(repository: Arc<dyn UserRepository>, targets: TargetResolver) -> Self {
        Self { repository, targets }
    }
}

#[async_trait]
impl UserService for StandardUserService {
    async fn create(&self, user: User) -> Result<(), ServiceError> {
        user.validate()?;
        let target = self.targets.by_ip(&user.host_ip).await?;

        if self.repository.find_by_name(&user.name).await?.is_some() {
            return Err(ServiceError::Conflict(format!("user '{}' already exists", user.name)));
        }

        if let Err(e) = target.driver.create_user(&target.ctx, &user).await {
            error!(user = %user.name, host = %target.host.name, trace_id = %target.ctx.trace_id, error = %e, "User creation failed on executor");
            return Err(e.into());
        }

        self.repository.insert(&user).await?;
        info!(user = %user.name, host = %target.host.name, "Created user");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        let user = self.get(name).await?;
        let target = self.targets.by_ip(&user.host_ip).await?;

        if let Err(e) = target.driver.delete_user(&target.ctx, &user).await {
            error!(user = %name, host = %target.host.name, trace_id = %target.ctx.trace_id, error = %e, "User deletion failed on executor; record kept");
            return Err(e.into());
        }

        self.repository.delete(name).await?;
        info!(user = %name, host = %target.host.name, "Deleted user");
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<User, ServiceError> {
        self.repository
            .find_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user '{}'", name)))
    }

    async fn list(&self, filter: &QueryFilter) -> Result<Page<User>, ServiceError> {
        Ok(self.repository.query(filter).await?)
    }

    async fn prune(&self, filter: &QueryFilter) -> Result<u64, ServiceError> {
        Ok(self.repository.delete_matching(filter).await?)
    }
}
