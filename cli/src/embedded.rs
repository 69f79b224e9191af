// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-process control plane
//!
//! Every CLI command runs the orchestrators directly against the metadata
//! store; there is no daemon to delegate to.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::debug;

use shareplane_core::application::ControlPlane;
use shareplane_core::domain::config::ControlPlaneConfig;

pub struct EmbeddedControlPlane {
    pub config: ControlPlaneConfig,
    pub plane: ControlPlane,
}

impl EmbeddedControlPlane {
    pub async fn open(config_path: Option<PathBuf>) -> Result<Self> {
        let config = load_config(config_path)?;

        let plane = ControlPlane::from_config(&config)
            .await
            .context("Failed to start control plane")?;
        debug!(database = %config.database.url, "Control plane ready");

        Ok(Self { config, plane })
    }

    pub async fn close(self) {
        self.plane.shutdown().await;
    }
}

/// Discover, load and validate configuration.
pub fn load_config(config_path: Option<PathBuf>) -> Result<ControlPlaneConfig> {
    let config = ControlPlaneConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}
