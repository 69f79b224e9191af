// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Appliance backend placeholder.
//!
//! Registered so that hosts declaring `appliance` resolve, but every
//! capability fails with [`DriverError::NotImplemented`] rather than
//! pretending to succeed.

use async_trait::async_trait;

use crate::domain::account::{LocalUser, User};
use crate::domain::backend::{BackendKind, DriverError, StorageDriver, SystemInfo};
use crate::domain::context::OperationContext;
use crate::domain::directory::Directory;
use crate::domain::share::Share;

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplianceDriver;

fn unsupported<T>(operation: &'static str) -> Result<T, DriverError> {
    Err(DriverError::NotImplemented {
        backend: BackendKind::Appliance,
        operation,
    })
}

#[async_trait]
impl StorageDriver for ApplianceDriver {
    fn kind(&self) -> BackendKind {
        BackendKind::Appliance
    }

    async fn create_directory(&self, _ctx: &OperationContext, _directory: &Directory) -> Result<(), DriverError> {
        unsupported("create_directory")
    }

    async fn delete_directory(&self, _ctx: &OperationContext, _directory: &Directory) -> Result<(), DriverError> {
        unsupported("delete_directory")
    }

    async fn create_cifs_share(&self, _ctx: &OperationContext, _share: &Share) -> Result<(), DriverError> {
        unsupported("create_cifs_share")
    }

    async fn delete_cifs_share(&self, _ctx: &OperationContext, _share: &Share) -> Result<(), DriverError> {
        unsupported("delete_cifs_share")
    }

    async fn mount_share(&self, _ctx: &OperationContext, _share: &Share, _mount_point: &str) -> Result<(), DriverError> {
        unsupported("mount_share")
    }

    async fn unmount_share(&self, _ctx: &OperationContext, _share: &Share) -> Result<(), DriverError> {
        unsupported("unmount_share")
    }

    async fn create_local_user(&self, _ctx: &OperationContext, _user: &LocalUser) -> Result<(), DriverError> {
        unsupported("create_local_user")
    }

    async fn delete_local_user(&self, _ctx: &OperationContext, _user: &LocalUser) -> Result<(), DriverError> {
        unsupported("delete_local_user")
    }

    async fn create_user(&self, _ctx: &OperationContext, _user: &User) -> Result<(), DriverError> {
        unsupported("create_user")
    }

    async fn delete_user(&self, _ctx: &OperationContext, _user: &User) -> Result<(), DriverError> {
        unsupported("delete_user")
    }

    async fn get_system_info(&self, _ctx: &OperationContext) -> Result<SystemInfo, DriverError> {
        unsupported("get_system_info")
    }
}
