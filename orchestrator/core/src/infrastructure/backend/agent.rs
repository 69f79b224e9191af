// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Agent Storage Driver
//!
//! Implements every [`StorageDriver`] capability by dispatching to the
//! executor agent running on the target host.
//!
//! # Operations
//!
//! | Capability | Operation path | Body |
//! |------------|----------------|------|
//! | create/delete directory | `directory/create`, `directory/delete` | `{name}` |
//! | create CIFS share | `share/create` | `{name, path, directory_name, description, access_user_names}` |
//! | delete CIFS share | `share/delete` | `{name}` |
//! | mount / unmount | `share/mount`, `share/unmount` | `{name, path, mount_point}` |
//! | local user | `local-user/create`, `local-user/delete` | `{name, password}` / `{name}` |
//! | user | `user/create`, `user/delete` | `{name, password}` / `{name}` |
//! | system info | `system/info` | `{}` |

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::domain::account::{LocalUser, User};
use crate::domain::backend::{BackendKind, DriverError, StorageDriver, SystemInfo};
use crate::domain::context::OperationContext;
use crate::domain::directory::Directory;
use crate::domain::share::Share;
use crate::infrastructure::dispatch::{DispatchResponse, RemoteDispatch};

pub struct AgentDriver {
    dispatcher: Arc<dyn RemoteDispatch>,
}

impl AgentDriver {
    pub fn new(dispatcher: Arc<dyn RemoteDispatch>) -> Self {
        Self { dispatcher }
    }

    async fn send(
        &self,
        ctx: &OperationContext,
        operation: &str,
        payload: Value,
    ) -> Result<DispatchResponse, DriverError> {
        Ok(self.dispatcher.execute(ctx, operation, &payload).await?)
    }
}

#[async_trait]
impl StorageDriver for AgentDriver {
    fn kind(&self) -> BackendKind {
        BackendKind::Agent
    }

    async fn create_directory(&self, ctx: &OperationContext, directory: &Directory) -> Result<(), DriverError> {
        self.send(ctx, "directory/create", json!({ "name": directory.name }))
            .await?;
        Ok(())
    }

    async fn delete_directory(&self, ctx: &OperationContext, directory: &Directory) -> Result<(), DriverError> {
        self.send(ctx, "directory/delete", json!({ "name": directory.name }))
            .await?;
        Ok(())
    }

    async fn create_cifs_share(&self, ctx: &OperationContext, share: &Share) -> Result<(), DriverError> {
        let payload = json!({
            "name": share.name,
            "path": share.effective_path(),
            "directory_name": share.directory_name,
            "description": share.description,
            "access_user_names": share.access_user_names,
        });
        self.send(ctx, "share/create", payload).await?;
        Ok(())
    }

    async fn delete_cifs_share(&self, ctx: &OperationContext, share: &Share) -> Result<(), DriverError> {
        self.send(ctx, "share/delete", json!({ "name": share.name }))
            .await?;
        Ok(())
    }

    async fn mount_share(&self, ctx: &OperationContext, share: &Share, mount_point: &str) -> Result<(), DriverError> {
        let payload = json!({
            "name": share.name,
            "path": share.effective_path(),
            "mount_point": mount_point,
        });
        self.send(ctx, "share/mount", payload).await?;
        Ok(())
    }

    async fn unmount_share(&self, ctx: &OperationContext, share: &Share) -> Result<(), DriverError> {
        let payload = json!({
            "name": share.name,
            "path": share.effective_path(),
            "mount_point": share.mount_point.as_deref().unwrap_or_default(),
        });
        self.send(ctx, "share/unmount", payload).await?;
        Ok(())
    }

    async fn create_local_user(&self, ctx: &OperationContext, user: &LocalUser) -> Result<(), DriverError> {
        let payload = json!({ "name": user.name, "password": user.password });
        self.send(ctx, "local-user/create", payload).await?;
        Ok(())
    }

    async fn delete_local_user(&self, ctx: &OperationContext, user: &LocalUser) -> Result<(), DriverError> {
        self.send(ctx, "local-user/delete", json!({ "name": user.name }))
            .await?;
        Ok(())
    }

    async fn create_user(&self, ctx: &OperationContext, user: &User) -> Result<(), DriverError> {
        let payload = json!({ "name": user.name, "password": user.password });
        self.send(ctx, "user/create", payload).await?;
        Ok(())
    }

    async fn delete_user(&self, ctx: &OperationContext, user: &User) -> Result<(), DriverError> {
        self.send(ctx, "user/delete", json!({ "name": user.name }))
            .await?;
        Ok(())
    }

    async fn get_system_info(&self, ctx: &OperationContext) -> Result<SystemInfo, DriverError> {
        let response = self.send(ctx, "system/info", json!({})).await?;
        response
            .json::<SystemInfo>()
            .map_err(|e| DriverError::MalformedResponse {
                host: ctx.host_ip.clone(),
                operation: "system/info".to_string(),
                message: e.to_string(),
            })
    }
}
