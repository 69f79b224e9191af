// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod control_plane;
pub mod directory_service;
pub mod error;
pub mod host_service;
pub mod refresh;
pub mod share_service;
pub mod target;
pub mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export services for convenience
pub use control_plane::ControlPlane;
pub use directory_service::{DirectoryService, StandardDirectoryService};
pub use error::ServiceError;
pub use host_service::{HostRefresh, HostService, RefreshOutcome, StandardHostService};
pub use refresh::RefreshScheduler;
pub use share_service::{ShareService, StandardShareService};
pub use user_service::{LocalUserService, StandardLocalUserService, StandardUserService, UserService};
