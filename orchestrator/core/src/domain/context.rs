// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::fmt;
use uuid::Uuid;

use crate::domain::host::Host;

/// Per-operation connection context.
///
/// Built once from the target [`Host`] record and threaded explicitly from
/// the orchestrator through the driver into the dispatch client.
#[derive(Clone)]
pub struct OperationContext {
    pub host_ip: String,
    pub username: String,
    pub password: String,
    pub trace_id: Uuid,
}

impl OperationContext {
    pub fn for_host(host: &Host) -> Self {
        Self {
            host_ip: host.ip.clone(),
            username: host.username.clone(),
            password: host.password.clone(),
            trace_id: Uuid::new_v4(),
        }
    }
}

impl fmt::Debug for OperationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationContext")
            .field("host_ip", &self.host_ip)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("trace_id", &self.trace_id)
            .finish()
    }
}
