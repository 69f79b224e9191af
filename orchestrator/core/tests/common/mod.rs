// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Fixtures shared by the integration tests: an in-memory control plane
//! whose executor calls are recorded instead of sent.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use shareplane_core::application::ControlPlane;
use shareplane_core::domain::context::OperationContext;
use shareplane_core::domain::host::Host;
use shareplane_core::infrastructure::backend::BackendRegistry;
use shareplane_core::infrastructure::db::Database;
use shareplane_core::infrastructure::dispatch::{DispatchError, DispatchResponse, RemoteDispatch};
use shareplane_core::infrastructure::secret_codec::SecretCodec;
use std::sync::{Arc, Mutex};

pub const KEY: [u8; 32] = [7u8; 32];

#[derive(Debug, Clone)]
pub struct Dispatched {
    pub host_ip: String,
    pub username: String,
    pub operation: String,
    pub payload: Value,
}

#[derive(Default)]
pub struct FakeExecutor {
    calls: Mutex<Vec<Dispatched>>,
    down: Mutex<bool>,
}

impl FakeExecutor {
    /// Every subsequent dispatch fails as if the executor were unreachable.
    pub fn go_down(&self) {
        *self.down.lock().unwrap() = true;
    }

    pub fn come_up(&self) {
        *self.down.lock().unwrap() = false;
    }

    pub fn calls(&self) -> Vec<Dispatched> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteDispatch for FakeExecutor {
    async fn execute(
        &self,
        ctx: &OperationContext,
        operation: &str,
        payload: &Value,
    ) -> Result<DispatchResponse, DispatchError> {
        self.calls.lock().unwrap().push(Dispatched {
            host_ip: ctx.host_ip.clone(),
            username: ctx.username.clone(),
            operation: operation.to_string(),
            payload: payload.clone(),
        });

        if *self.down.lock().unwrap() {
            return Err(DispatchError::Transport {
                host: ctx.host_ip.clone(),
                operation: operation.to_string(),
                message: "connection refused".to_string(),
            });
        }

        Ok(DispatchResponse {
            status: 204,
            body: String::new(),
        })
    }
}

pub async fn control_plane() -> (ControlPlane, Arc<FakeExecutor>) {
    let executor = Arc::new(FakeExecutor::default());
    let database = Database::in_memory().await.unwrap();
    let codec = SecretCodec::new(&KEY).unwrap();
    let plane = ControlPlane::assemble(database, codec, BackendRegistry::standard(executor.clone()));
    (plane, executor)
}

pub fn h1() -> Host {
    Host::new("h1", "10.0.0.1", "admin", "Secret123", "agent")
}
