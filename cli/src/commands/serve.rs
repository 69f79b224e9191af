// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Long-running control plane
//!
//! Keeps the metadata store open, refreshes every registered host on the
//! configured interval and optionally exposes Prometheus metrics. Runs in
//! the foreground until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Args;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use shareplane_core::application::RefreshScheduler;

use crate::embedded::EmbeddedControlPlane;

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Override refresh.interval_secs
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Override metrics.listen
    #[arg(long, value_name = "ADDR")]
    pub metrics_listen: Option<SocketAddr>,
}

pub async fn run(args: ServeArgs, embedded: EmbeddedControlPlane) -> Result<()> {
    let listen = match args.metrics_listen {
        Some(addr) => Some(addr),
        None => embedded
            .config
            .metrics
            .listen
            .as_deref()
            .map(str::parse::<SocketAddr>)
            .transpose()
            .context("metrics.listen is not a socket address")?,
    };
    if let Some(addr) = listen {
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!(%addr, "Prometheus metrics listening");
    }

    let cancel = CancellationToken::new();
    let interval_secs = args.interval.unwrap_or(embedded.config.refresh.interval_secs);

    let scheduler = if embedded.config.refresh.enabled || args.interval.is_some() {
        if interval_secs == 0 {
            anyhow::bail!("refresh interval must be at least 1 second");
        }
        let scheduler =
            RefreshScheduler::new(embedded.plane.hosts.clone(), Duration::from_secs(interval_secs));
        Some(scheduler.spawn(cancel.clone()))
    } else {
        warn!("Host refresh disabled; serving without a scheduler");
        None
    };

    info!("shareplane control plane running");
    shutdown_signal().await;

    cancel.cancel();
    if let Some(handle) = scheduler {
        if let Err(e) = handle.await {
            warn!(error = %e, "Refresh scheduler did not stop cleanly");
        }
    }

    embedded.close().await;
    info!("shareplane control plane stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
