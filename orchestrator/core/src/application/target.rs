// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Target resolution shared by every orchestrator: host record, its driver
//! and a fresh operation context.

use std::sync::Arc;

use crate::application::error::ServiceError;
use crate::domain::backend::StorageDriver;
use crate::domain::context::OperationContext;
use crate::domain::host::Host;
use crate::domain::repository::HostRepository;
use crate::infrastructure::backend::BackendRegistry;

/// Everything needed to dispatch one operation to one host.
pub struct Target {
    pub host: Host,
    pub driver: Arc<dyn StorageDriver>,
    pub ctx: OperationContext,
}

#[derive(Clone)]
pub struct TargetResolver {
    hosts: Arc<dyn HostRepository>,
    backends: Arc<BackendRegistry>,
}

impl TargetResolver {
    pub fn new(hosts: Arc<dyn HostRepository>, backends: Arc<BackendRegistry>) -> Self {
        Self { hosts, backends }
    }

    pub async fn by_ip(&self, ip: &str) -> Result<Target, ServiceError> {
        let host = self
            .hosts
            .find_by_ip(ip)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no host registered with ip '{}'", ip)))?;
        self.bind(host)
    }

    pub async fn by_name(&self, name: &str) -> Result<Target, ServiceError> {
        let host = self
            .hosts
            .find_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no host registered as '{}'", name)))?;
        self.bind(host)
    }

    pub fn bind(&self, host: Host) -> Result<Target, ServiceError> {
        let driver = self.backends.resolve(&host.storage_type)?;
        let ctx = OperationContext::for_host(&host);
        Ok(Target { host, driver, ctx })
    }
}
