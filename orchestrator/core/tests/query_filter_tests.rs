// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! List and prune through the generic filter/pagination engine.

mod common;

use common::{control_plane, h1};
use shareplane_core::application::{ControlPlane, ServiceError};
use shareplane_core::domain::directory::Directory;
use shareplane_core::domain::query::QueryFilter;

async fn twelve_directories() -> ControlPlane {
    let (plane, _) = control_plane().await;
    plane.hosts.register(h1()).await.unwrap();
    for i in 1..=12 {
        plane
            .directories
            .create(Directory::new(format!("vol{:02}", i), "10.0.0.1"))
            .await
            .unwrap();
    }
    plane
}

#[tokio::test]
async fn second_page_of_five_over_twelve() {
    let plane = twelve_directories().await;

    let page = plane
        .directories
        .list(&QueryFilter::new().paginate(2, 5))
        .await
        .unwrap();

    assert_eq!(page.total, 12);
    let names: Vec<_> = page.records.into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["vol06", "vol07", "vol08", "vol09", "vol10"]);
}

#[tokio::test]
async fn unknown_field_is_validation_error() {
    let plane = twelve_directories().await;

    let err = plane
        .directories
        .list(&QueryFilter::new().field("name").field("secret_column"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(msg) if msg.contains("invalid attribute")));
}

#[tokio::test]
async fn empty_keyword_value_does_not_filter() {
    let plane = twelve_directories().await;

    let page = plane
        .directories
        .list(&QueryFilter::new().keyword("name", ""))
        .await
        .unwrap();
    assert_eq!(page.total, 12);
}

#[tokio::test]
async fn filter_arrives_in_wire_shape() {
    let plane = twelve_directories().await;

    let filter: QueryFilter = serde_json::from_value(serde_json::json!({
        "fields": ["name"],
        "keyword": {"name": "VOL1"},
        "pagination": null,
        "conditions": {"host_ip": "10.0.0.1"}
    }))
    .unwrap();

    let page = plane.hosts.list(&QueryFilter::new().field("name")).await.unwrap();
    assert_eq!(page.records[0].password, "");

    let page = plane.directories.list(&filter).await.unwrap();
    let names: Vec<_> = page.records.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["vol10", "vol11", "vol12"]);
    assert!(page.records.iter().all(|d| d.host_ip.is_empty()));
}

#[tokio::test]
async fn prune_removes_matching_metadata_only() {
    let (plane, executor) = control_plane().await;
    plane.hosts.register(h1()).await.unwrap();
    for name in ["keep", "tmp-a", "tmp-b"] {
        plane
            .directories
            .create(Directory::new(name, "10.0.0.1"))
            .await
            .unwrap();
    }
    let dispatched = executor.calls().len();

    let removed = plane
        .directories
        .prune(&QueryFilter::new().keyword("name", "tmp-"))
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(executor.calls().len(), dispatched);

    let err = plane.directories.prune(&QueryFilter::new()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = plane
        .directories
        .prune(&QueryFilter::new().keyword("name", "keep").paginate(1, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}
