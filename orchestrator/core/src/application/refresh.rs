// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Refresh Scheduler
//!
//! Background task that runs [`HostService::refresh_all`] on a fixed
//! interval until cancelled. A run that outlasts the interval delays the
//! next tick instead of queueing extra ones. Failures are logged and the
//! loop carries on.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::application::host_service::HostService;

pub struct RefreshScheduler {
    hosts: Arc<dyn HostService>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(hosts: Arc<dyn HostService>, interval: Duration) -> Self {
        Self { hosts, interval }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_secs = self.interval.as_secs(), "Host refresh scheduler started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.hosts.refresh_all().await {
                        error!(error = %e, "Host refresh run failed");
                    }
                }
            }
        }

        info!("Host refresh scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ServiceError;
    use crate::application::host_service::HostRefresh;
    use crate::domain::host::Host;
    use crate::domain::query::{Page, QueryFilter};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingHosts {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl HostService for CountingHosts {
        async fn register(&self, _host: Host) -> Result<(), ServiceError> {
            unimplemented!()
        }

        async fn unregister(&self, _name_or_ip: &str) -> Result<Host, ServiceError> {
            unimplemented!()
        }

        async fn get(&self, _name_or_ip: &str) -> Result<Host, ServiceError> {
            unimplemented!()
        }

        async fn list(&self, _filter: &QueryFilter) -> Result<Page<Host>, ServiceError> {
            unimplemented!()
        }

        async fn refresh_all(&self) -> Result<Vec<HostRefresh>, ServiceError> {
            let run = self.runs.fetch_add(1, Ordering::SeqCst);
            if run == 1 {
                return Err(ServiceError::Storage("database is locked".to_string()));
            }
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_on_interval_until_cancelled() {
        let hosts = Arc::new(CountingHosts::default());
        let cancel = CancellationToken::new();
        let handle =
            RefreshScheduler::new(hosts.clone(), Duration::from_secs(60)).spawn(cancel.clone());

        // Ticks at 0s, 60s and 120s; the failed second run does not stop the loop
        tokio::time::sleep(Duration::from_secs(125)).await;
        assert_eq!(hosts.runs.load(Ordering::SeqCst), 3);

        cancel.cancel();
        handle.await.unwrap();

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(hosts.runs.load(Ordering::SeqCst), 3);
    }
}
