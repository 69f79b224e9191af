// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! The full control plane talking HTTP to a mock executor.

use mockito::Matcher;
use serde_json::json;
use shareplane_core::application::{ControlPlane, RefreshOutcome, ServiceError};
use shareplane_core::domain::config::AgentSettings;
use shareplane_core::domain::directory::Directory;
use shareplane_core::domain::host::Host;
use shareplane_core::infrastructure::backend::BackendRegistry;
use shareplane_core::infrastructure::db::Database;
use shareplane_core::infrastructure::secret_codec::SecretCodec;

async fn plane_for(server: &mockito::ServerGuard) -> ControlPlane {
    let address = server.host_with_port();
    let (_, port) = address.rsplit_once(':').unwrap();

    let settings = AgentSettings {
        port: port.parse().unwrap(),
        timeout_secs: 5,
        ..AgentSettings::default()
    };
    let backends = BackendRegistry::from_settings(&settings).unwrap();
    let database = Database::in_memory().await.unwrap();
    let plane = ControlPlane::assemble(database, SecretCodec::new(&[7u8; 32]).unwrap(), backends);

    plane
        .hosts
        .register(Host::new("local", "127.0.0.1", "admin", "Secret123", "agent-executed"))
        .await
        .unwrap();
    plane
}

#[tokio::test]
async fn directory_create_over_http() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/agent/directory/create")
        .match_header("agent-username", "admin")
        .match_header("agent-password", "Secret123")
        .match_header("x-trace-id", Matcher::Regex("^[0-9a-f-]{36}$".to_string()))
        .match_body(Matcher::Json(json!({"name": "d1"})))
        .with_status(201)
        .create_async()
        .await;

    let plane = plane_for(&server).await;
    plane
        .directories
        .create(Directory::new("d1", "127.0.0.1"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(plane.directories.get("d1", "127.0.0.1").await.is_ok());
}

#[tokio::test]
async fn executor_error_status_is_upstream_and_not_persisted() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/agent/directory/create")
        .with_status(503)
        .with_body("executor busy")
        .create_async()
        .await;

    let plane = plane_for(&server).await;
    let err = plane
        .directories
        .create(Directory::new("d1", "127.0.0.1"))
        .await
        .unwrap_err();

    assert!(matches!(&err, ServiceError::Upstream(msg) if msg.contains("503")));
    assert!(matches!(
        plane.directories.get("d1", "127.0.0.1").await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn refresh_parses_system_info() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/agent/system/info")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"hostname": "files01", "os": "linux", "memory_bytes": 8589934592}"#)
        .create_async()
        .await;

    let plane = plane_for(&server).await;
    let reports = plane.hosts.refresh_all().await.unwrap();

    match &reports[0].outcome {
        RefreshOutcome::Online { system_info } => {
            assert_eq!(system_info.hostname.as_deref(), Some("files01"));
            assert_eq!(system_info.memory_bytes, Some(8_589_934_592));
        }
        other => panic!("expected online host, got {:?}", other),
    }
}
