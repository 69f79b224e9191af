// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Backend Registry - Storage Type Resolution
//
// Binds each enumerated BackendKind to a concrete StorageDriver at startup
// and resolves a host's storage_type identifier to that driver. Resolution
// failure is always an explicit UnsupportedBackend error.

pub mod agent;
pub mod appliance;

pub use agent::AgentDriver;
pub use appliance::ApplianceDriver;

use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::domain::backend::{BackendKind, StorageDriver, UnsupportedBackend};
use crate::domain::config::AgentSettings;
use crate::infrastructure::dispatch::{DispatchError, HttpDispatchClient, RemoteDispatch};

#[derive(Clone, Default)]
pub struct BackendRegistry {
    drivers: HashMap<BackendKind, Arc<dyn StorageDriver>>,
}

impl BackendRegistry {
    /// Empty registry; every lookup fails until drivers are bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `driver` under its own kind, replacing any earlier binding.
    pub fn with_driver(mut self, driver: Arc<dyn StorageDriver>) -> Self {
        self.drivers.insert(driver.kind(), driver);
        self
    }

    /// Every known kind bound: the agent driver over `dispatcher`, and the
    /// appliance stub.
    pub fn standard(dispatcher: Arc<dyn RemoteDispatch>) -> Self {
        Self::new()
            .with_driver(Arc::new(AgentDriver::new(dispatcher)))
            .with_driver(Arc::new(ApplianceDriver))
    }

    /// Standard registry dispatching over HTTP with the configured transport.
    pub fn from_settings(settings: &AgentSettings) -> Result<Self, DispatchError> {
        let dispatcher = HttpDispatchClient::new(settings)?;
        let registry = Self::standard(Arc::new(dispatcher));
        info!(kinds = ?registry.kinds(), "Backend registry initialized");
        Ok(registry)
    }

    pub fn resolve(&self, identifier: &str) -> Result<Arc<dyn StorageDriver>, UnsupportedBackend> {
        let kind: BackendKind = identifier.parse()?;
        self.drivers
            .get(&kind)
            .cloned()
            .ok_or_else(|| UnsupportedBackend(identifier.to_string()))
    }

    pub fn kinds(&self) -> Vec<BackendKind> {
        let mut kinds: Vec<_> = self.drivers.keys().copied().collect();
        kinds.sort();
        kinds
    }
}
