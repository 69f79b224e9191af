// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Host registry behaviour through the assembled control plane.

mod common;

use common::{control_plane, h1};
use shareplane_core::application::ServiceError;
use shareplane_core::domain::backend::{BackendKind, UnsupportedBackend};
use shareplane_core::domain::directory::Directory;
use shareplane_core::domain::host::Host;
use shareplane_core::domain::query::QueryFilter;
use shareplane_core::infrastructure::backend::BackendRegistry;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn register_then_reregister_same_ip_conflicts() {
    let (plane, _) = control_plane().await;

    assert_ok!(plane.hosts.register(h1()).await);

    let same_ip = Host::new("h2", "10.0.0.1", "admin", "Secret123", "agent");
    let err = assert_err!(plane.hosts.register(same_ip).await);
    assert!(matches!(err, ServiceError::Conflict(_)));

    let same_name = Host::new("h1", "10.0.0.2", "admin", "Secret123", "agent");
    let err = assert_err!(plane.hosts.register(same_name).await);
    assert!(matches!(err, ServiceError::Conflict(_)));

    assert_eq!(plane.hosts.list(&QueryFilter::new()).await.unwrap().total, 1);
}

#[tokio::test]
async fn registered_host_reads_back_with_plaintext_password() {
    let (plane, _) = control_plane().await;
    plane.hosts.register(h1()).await.unwrap();

    let by_name = plane.hosts.get("h1").await.unwrap();
    let by_ip = plane.hosts.get("10.0.0.1").await.unwrap();
    assert_eq!(by_name, h1());
    assert_eq!(by_ip, h1());

    let stored: String = sqlx::query_scalar("SELECT password FROM hosts")
        .fetch_one(plane.database.get_pool())
        .await
        .unwrap();
    assert_ne!(stored, "Secret123");
}

#[tokio::test]
async fn unregister_does_not_cascade_to_directories() {
    let (plane, executor) = control_plane().await;
    plane.hosts.register(h1()).await.unwrap();
    plane
        .directories
        .create(Directory::new("d1", "10.0.0.1"))
        .await
        .unwrap();

    let removed = plane.hosts.unregister("h1").await.unwrap();
    assert_eq!(removed.ip, "10.0.0.1");
    assert!(matches!(plane.hosts.get("h1").await, Err(ServiceError::NotFound(_))));

    // The directory record outlives its host
    let directory = plane.directories.get("d1", "10.0.0.1").await.unwrap();
    assert_eq!(directory, Directory::new("d1", "10.0.0.1"));

    // Unregistering is metadata-only
    let operations: Vec<_> = executor.calls().into_iter().map(|c| c.operation).collect();
    assert_eq!(operations, vec!["directory/create"]);
}

#[tokio::test]
async fn unregister_unknown_host_is_not_found() {
    let (plane, _) = control_plane().await;
    let err = assert_err!(plane.hosts.unregister("ghost").await);
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn unregistered_backend_identifier_is_an_error() {
    let registry = BackendRegistry::new();
    assert_eq!(
        registry.resolve("agent").err(),
        Some(UnsupportedBackend("agent".to_string()))
    );

    let registry = BackendRegistry::standard(Arc::new(common::FakeExecutor::default()));
    assert_eq!(
        registry.resolve("ceph").err(),
        Some(UnsupportedBackend("ceph".to_string()))
    );
    assert_eq!(registry.resolve("agent-executed").unwrap().kind(), BackendKind::Agent);
}

#[tokio::test]
async fn refresh_reports_unreachable_hosts_without_failing() {
    let (plane, executor) = control_plane().await;
    plane.hosts.register(h1()).await.unwrap();
    executor.go_down();

    let reports = plane.hosts.refresh_all().await.unwrap();
    assert_eq!(reports.len(), 1);
    assert!(!reports[0].is_online());
    assert_eq!(executor.calls()[0].operation, "system/info");
}
