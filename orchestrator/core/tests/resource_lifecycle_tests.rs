// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! End-to-end create/delete flows: dispatch first, persist only on success.

mod common;

use common::{control_plane, h1};
use shareplane_core::application::ServiceError;
use shareplane_core::domain::account::{LocalUser, User};
use shareplane_core::domain::directory::Directory;
use shareplane_core::domain::host::Host;
use shareplane_core::domain::query::QueryFilter;
use shareplane_core::domain::share::Share;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn directory_create_dispatches_to_host_then_persists() {
    let (plane, executor) = control_plane().await;
    plane.hosts.register(h1()).await.unwrap();

    let created = assert_ok!(plane.directories.create(Directory::new("d1", "10.0.0.1")).await);
    assert_eq!(created, Directory::new("d1", "10.0.0.1"));

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].host_ip, "10.0.0.1");
    assert_eq!(calls[0].username, "admin");
    assert_eq!(calls[0].operation, "directory/create");
    assert_eq!(calls[0].payload, serde_json::json!({"name": "d1"}));

    let fetched = plane.directories.get("d1", "10.0.0.1").await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn failed_directory_dispatch_leaves_no_record() {
    let (plane, executor) = control_plane().await;
    plane.hosts.register(h1()).await.unwrap();
    executor.go_down();

    let err = assert_err!(plane.directories.create(Directory::new("d1", "10.0.0.1")).await);
    assert!(matches!(err, ServiceError::Upstream(_)));
    assert_eq!(executor.calls().len(), 1);

    let err = assert_err!(plane.directories.get("d1", "10.0.0.1").await);
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(plane.directories.list(&QueryFilter::new()).await.unwrap().total, 0);
}

#[tokio::test]
async fn duplicate_directory_on_same_host_conflicts() {
    let (plane, _) = control_plane().await;
    plane.hosts.register(h1()).await.unwrap();
    plane
        .hosts
        .register(Host::new("h2", "10.0.0.2", "admin", "pw", "agent"))
        .await
        .unwrap();

    plane.directories.create(Directory::new("d1", "10.0.0.1")).await.unwrap();
    plane.directories.create(Directory::new("d1", "10.0.0.2")).await.unwrap();

    let err = assert_err!(plane.directories.create(Directory::new("d1", "10.0.0.1")).await);
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn local_user_password_survives_round_trip() {
    let (plane, _) = control_plane().await;
    plane.hosts.register(h1()).await.unwrap();

    plane
        .local_users
        .create(LocalUser::new("u1", "Passw0rd!", "h1"))
        .await
        .unwrap();

    let user = plane.local_users.get("u1").await.unwrap();
    assert_eq!(user.password, "Passw0rd!");

    let stored: String = sqlx::query_scalar("SELECT password FROM local_users WHERE name = 'u1'")
        .fetch_one(plane.database.get_pool())
        .await
        .unwrap();
    assert_ne!(stored, "Passw0rd!");
}

#[tokio::test]
async fn appliance_host_operations_are_unsupported() {
    let (plane, executor) = control_plane().await;
    plane
        .hosts
        .register(Host::new("nas", "10.0.0.9", "admin", "pw", "appliance"))
        .await
        .unwrap();

    let err = assert_err!(plane.users.create(User::new("bob", "pw", "10.0.0.9")).await);
    assert!(matches!(err, ServiceError::UnsupportedBackend(_)));
    assert!(executor.calls().is_empty());
    assert!(matches!(plane.users.get("bob").await, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn share_lifecycle_with_access_users() {
    let (plane, executor) = control_plane().await;
    plane.hosts.register(h1()).await.unwrap();
    plane.directories.create(Directory::new("d1", "10.0.0.1")).await.unwrap();

    let share = Share::new("s1", "10.0.0.1", "d1")
        .with_description("finance")
        .with_access_users(["carol", "alice", "bob"]);
    plane.shares.create(share.clone()).await.unwrap();

    let loaded = plane.shares.get("s1").await.unwrap();
    assert_eq!(loaded.access_user_names, vec!["carol", "alice", "bob"]);

    plane.shares.mount("s1", "/mnt/finance").await.unwrap();
    executor.go_down();
    assert!(matches!(plane.shares.delete("s1").await, Err(ServiceError::Upstream(_))));
    assert!(plane.shares.get("s1").await.is_ok());

    executor.come_up();
    plane.shares.delete("s1").await.unwrap();
    assert!(matches!(plane.shares.get("s1").await, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn concurrent_creates_for_same_identity_yield_one_conflict() {
    let (plane, _) = control_plane().await;
    plane.hosts.register(h1()).await.unwrap();

    let a = plane.users.create(User::new("dup", "pw", "10.0.0.1"));
    let b = plane.users.create(User::new("dup", "pw", "10.0.0.1"));
    let (a, b) = tokio::join!(a, b);

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(ServiceError::Conflict(_)))));
}
