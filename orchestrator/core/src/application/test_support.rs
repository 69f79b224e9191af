// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Shared fixtures for service unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use crate::application::control_plane::ControlPlane;
use crate::domain::context::OperationContext;
use crate::domain::host::Host;
use crate::infrastructure::backend::BackendRegistry;
use crate::infrastructure::db::Database;
use crate::infrastructure::dispatch::{DispatchError, DispatchResponse, RemoteDispatch};
use crate::infrastructure::secret_codec::SecretCodec;

#[derive(Debug, Clone)]
pub struct DispatchCall {
    pub host_ip: String,
    pub operation: String,
    pub payload: Value,
}

/// Records every dispatch; can be told to reject one operation.
#[derive(Default)]
pub struct RecordingDispatch {
    calls: Mutex<Vec<DispatchCall>>,
    failing: Mutex<Option<String>>,
    reply: Mutex<String>,
}

impl RecordingDispatch {
    pub fn fail_on(&self, operation: &str) {
        *self.failing.lock().unwrap() = Some(operation.to_string());
    }

    pub fn succeed(&self) {
        *self.failing.lock().unwrap() = None;
    }

    pub fn reply_with(&self, body: &str) {
        *self.reply.lock().unwrap() = body.to_string();
    }

    pub fn calls(&self) -> Vec<DispatchCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteDispatch for RecordingDispatch {
    async fn execute(
        &self,
        ctx: &OperationContext,
        operation: &str,
        payload: &Value,
    ) -> Result<DispatchResponse, DispatchError> {
        self.calls.lock().unwrap().push(DispatchCall {
            host_ip: ctx.host_ip.clone(),
            operation: operation.to_string(),
            payload: payload.clone(),
        });

        if self.failing.lock().unwrap().as_deref() == Some(operation) {
            return Err(DispatchError::Status {
                host: ctx.host_ip.clone(),
                operation: operation.to_string(),
                status: 500,
                body: "executor failure".to_string(),
            });
        }

        Ok(DispatchResponse {
            status: 200,
            body: self.reply.lock().unwrap().clone(),
        })
    }
}

pub struct Harness {
    pub plane: ControlPlane,
    pub dispatch: Arc<RecordingDispatch>,
}

impl Harness {
    pub async fn new() -> Self {
        let dispatch = Arc::new(RecordingDispatch::default());
        let database = Database::in_memory().await.unwrap();
        let codec = SecretCodec::new(&[7u8; 32]).unwrap();
        let plane = ControlPlane::assemble(database, codec, BackendRegistry::standard(dispatch.clone()));
        Self { plane, dispatch }
    }

    /// Harness with `h1` / `10.0.0.1` registered on the agent backend.
    pub async fn with_host() -> Self {
        let harness = Self::new().await;
        harness
            .plane
            .hosts
            .register(Host::new("h1", "10.0.0.1", "admin", "Secret123", "agent"))
            .await
            .unwrap();
        harness
    }
}
