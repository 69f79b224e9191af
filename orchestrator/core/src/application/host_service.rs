// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Host Registry Application Service
//!
//! Registration, lookup and periodic refresh of managed hosts.
//!
//! Registration and unregistration only touch the metadata store: no
//! executor call is made, and unregistering a host leaves its directories,
//! shares and accounts in place.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::error::ServiceError;
use crate::application::target::TargetResolver;
use crate::domain::backend::{BackendKind, SystemInfo};
use crate::domain::host::Host;
use crate::domain::query::{Page, QueryFilter};
use crate::domain::repository::HostRepository;

/// Result of refreshing one host.
#[derive(Debug, Clone, Serialize)]
pub struct HostRefresh {
    pub host_name: String,
    pub host_ip: String,
    pub checked_at: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: RefreshOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Online { system_info: SystemInfo },
    Failed { error: String },
}

impl HostRefresh {
    pub fn is_online(&self) -> bool {
        matches!(self.outcome, RefreshOutcome::Online { .. })
    }
}

#[async_trait]
pub trait HostService: Send + Sync {
    /// Persist a new host. Fails with `Conflict` if the name or the IP is
    /// already registered.
    async fn register(&self, host: Host) -> Result<(), ServiceError>;

    /// Remove a host record by name or IP, returning what was removed.
    async fn unregister(&self, name_or_ip: &str) -> Result<Host, ServiceError>;

    async fn get(&self, name_or_ip: &str) -> Result<Host, ServiceError>;

    async fn list(&self, filter: &QueryFilter) -> Result<Page<Host>, ServiceError>;

    /// Ask every registered host's executor for its system info.
    async fn refresh_all(&self) -> Result<Vec<HostRefresh>, ServiceError>;
}

pub struct StandardHostService {
    repository: Arc<dyn HostRepository>,
    targets: TargetResolver,
}

impl StandardHostService {
    pub fn new(repository: Arc<dyn HostRepository>, targets: TargetResolver) -> Self {
        Self { repository, targets }
    }

    async fn refresh_one(&self, host: Host) -> HostRefresh {
        let host_name = host.name.clone();
        let host_ip = host.ip.clone();

        let outcome = match self.targets.bind(host) {
            Ok(target) => match target.driver.get_system_info(&target.ctx).await {
                Ok(system_info) => RefreshOutcome::Online { system_info },
                Err(e) => RefreshOutcome::Failed {
                    error: ServiceError::from(e).to_string(),
                },
            },
            Err(e) => RefreshOutcome::Failed {
                error: e.to_string(),
            },
        };

        if let RefreshOutcome::Failed { error } = &outcome {
            warn!(host = %host_name, ip = %host_ip, error = %error, "Host refresh failed");
        }

        HostRefresh {
            host_name,
            host_ip,
            checked_at: Utc::now(),
            outcome,
        }
    }
}

#[async_trait]
impl HostService for StandardHostService {
    async fn register(&self, host: Host) -> Result<(), ServiceError> {
        host.validate()?;
        let kind: BackendKind = host.storage_type.parse()?;

        if self.repository.find_by_name(&host.name).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "a host named '{}' is already registered",
                host.name
            )));
        }
        if self.repository.find_by_ip(&host.ip).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "a host with ip '{}' is already registered",
                host.ip
            )));
        }

        self.repository.insert(&host).await?;
        info!(host = %host.name, ip = %host.ip, backend = %kind, "Registered host");
        Ok(())
    }

    async fn unregister(&self, name_or_ip: &str) -> Result<Host, ServiceError> {
        let host = self.get(name_or_ip).await?;
        self.repository.delete(&host.name).await?;
        info!(host = %host.name, ip = %host.ip, "Unregistered host");
        Ok(host)
    }

    async fn get(&self, name_or_ip: &str) -> Result<Host, ServiceError> {
        debug!(key = name_or_ip, "Looking up host");
        self.repository
            .find_by_name_or_ip(name_or_ip)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("host '{}'", name_or_ip)))
    }

    async fn list(&self, filter: &QueryFilter) -> Result<Page<Host>, ServiceError> {
        Ok(self.repository.query(filter).await?)
    }

    async fn refresh_all(&self) -> Result<Vec<HostRefresh>, ServiceError> {
        let hosts = self.repository.list_all().await?;
        let reports = join_all(hosts.into_iter().map(|host| self.refresh_one(host))).await;

        let online = reports.iter().filter(|r| r.is_online()).count();
        metrics::counter!("shareplane_refresh_total").increment(1);
        info!(hosts = reports.len(), online, "Host refresh complete");
        Ok(reports)
    }
}
