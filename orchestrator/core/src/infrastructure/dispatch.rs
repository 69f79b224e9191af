// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Remote Dispatch Client
//!
//! Sends one operation to a host's executor and reports the outcome.
//!
//! # Executor Contract
//!
//! - `POST {scheme}://{host_ip}:{port}/{base_path}/{resource}/{action}`
//! - JSON body with the resource parameters
//! - Credentials in the `agent-username` / `agent-password` headers, plus
//!   `x-trace-id` for correlation
//! - Any 2xx status is success; the body is only parsed by callers that
//!   need it
//!
//! There is no retry. The request runs on its own task so that dropping the
//! caller's future does not abort a dispatch already on the wire.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::backend::DriverError;
use crate::domain::config::AgentSettings;
use crate::domain::context::OperationContext;

pub const USERNAME_HEADER: &str = "agent-username";
pub const PASSWORD_HEADER: &str = "agent-password";
pub const TRACE_HEADER: &str = "x-trace-id";

const BODY_EXCERPT_LEN: usize = 256;

/// A successful executor reply.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResponse {
    pub status: u16,
    pub body: String,
}

impl DispatchResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("could not reach executor at {host} for {operation}: {message}")]
    Transport {
        host: String,
        operation: String,
        message: String,
    },

    #[error("executor at {host} rejected {operation} with HTTP {status}: {body}")]
    Status {
        host: String,
        operation: String,
        status: u16,
        body: String,
    },

    #[error("dispatch client misconfigured: {0}")]
    Client(String),
}

impl From<DispatchError> for DriverError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Transport {
                host,
                operation,
                message,
            } => DriverError::Upstream {
                host,
                operation,
                status: None,
                message,
            },
            DispatchError::Status {
                host,
                operation,
                status,
                body,
            } => DriverError::Upstream {
                host,
                operation,
                status: Some(status),
                message: format!("HTTP {}: {}", status, body),
            },
            DispatchError::Client(message) => DriverError::Upstream {
                host: String::new(),
                operation: String::new(),
                status: None,
                message,
            },
        }
    }
}

#[async_trait]
pub trait RemoteDispatch: Send + Sync {
    async fn execute(
        &self,
        ctx: &OperationContext,
        operation: &str,
        payload: &Value,
    ) -> Result<DispatchResponse, DispatchError>;
}

/// HTTP implementation of [`RemoteDispatch`].
#[derive(Debug, Clone)]
pub struct HttpDispatchClient {
    client: Client,
    scheme: String,
    port: u16,
    base_path: String,
}

impl HttpDispatchClient {
    pub fn new(settings: &AgentSettings) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| DispatchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            scheme: settings.scheme.clone(),
            port: settings.port,
            base_path: settings.base_path.trim_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, host_ip: &str, operation: &str) -> String {
        let host = match host_ip.parse::<IpAddr>() {
            Ok(IpAddr::V6(v6)) => format!("[{}]", v6),
            _ => host_ip.to_string(),
        };
        let operation = operation.trim_start_matches('/');

        if self.base_path.is_empty() {
            format!("{}://{}:{}/{}", self.scheme, host, self.port, operation)
        } else {
            format!(
                "{}://{}:{}/{}/{}",
                self.scheme, host, self.port, self.base_path, operation
            )
        }
    }
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

fn record_outcome(operation: &str, outcome: &'static str) {
    metrics::counter!(
        "shareplane_dispatch_total",
        "operation" => operation.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

#[async_trait]
impl RemoteDispatch for HttpDispatchClient {
    async fn execute(
        &self,
        ctx: &OperationContext,
        operation: &str,
        payload: &Value,
    ) -> Result<DispatchResponse, DispatchError> {
        let url = self.endpoint(&ctx.host_ip, operation);
        debug!(host = %ctx.host_ip, operation, trace_id = %ctx.trace_id, "Dispatching to executor");

        let request = self
            .client
            .post(&url)
            .header(USERNAME_HEADER, &ctx.username)
            .header(PASSWORD_HEADER, &ctx.password)
            .header(TRACE_HEADER, ctx.trace_id.to_string())
            .json(payload);

        let transport = |message: String| DispatchError::Transport {
            host: ctx.host_ip.clone(),
            operation: operation.to_string(),
            message,
        };

        let exchange = tokio::spawn(async move {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        });

        let (status, body) = match exchange.await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                record_outcome(operation, "transport_error");
                warn!(host = %ctx.host_ip, operation, trace_id = %ctx.trace_id, error = %e, "Executor unreachable");
                return Err(transport(e.to_string()));
            }
            Err(e) => {
                record_outcome(operation, "transport_error");
                return Err(transport(format!("dispatch task failed: {}", e)));
            }
        };

        if !status.is_success() {
            record_outcome(operation, "rejected");
            warn!(
                host = %ctx.host_ip,
                operation,
                trace_id = %ctx.trace_id,
                status = status.as_u16(),
                "Executor rejected operation"
            );
            return Err(DispatchError::Status {
                host: ctx.host_ip.clone(),
                operation: operation.to_string(),
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        record_outcome(operation, "success");
        Ok(DispatchResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn ctx(host_ip: &str) -> OperationContext {
        OperationContext {
            host_ip: host_ip.to_string(),
            username: "admin".to_string(),
            password: "Secret123".to_string(),
            trace_id: Uuid::new_v4(),
        }
    }

    fn client_for(server: &mockito::ServerGuard) -> HttpDispatchClient {
        let (_, port) = server
            .host_with_port()
            .rsplit_once(':')
            .map(|(h, p)| (h.to_string(), p.parse::<u16>().unwrap()))
            .unwrap();
        HttpDispatchClient::new(&AgentSettings {
            port,
            timeout_secs: 5,
            ..AgentSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_layout() {
        let client = HttpDispatchClient::new(&AgentSettings::default()).unwrap();
        assert_eq!(
            client.endpoint("10.0.0.1", "directory/create"),
            "http://10.0.0.1:8731/agent/directory/create"
        );
        assert_eq!(
            client.endpoint("fd00::1", "/system/info"),
            "http://[fd00::1]:8731/agent/system/info"
        );
    }

    #[tokio::test]
    async fn test_credentials_travel_as_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/agent/directory/create")
            .match_header(USERNAME_HEADER, "admin")
            .match_header(PASSWORD_HEADER, "Secret123")
            .match_header(TRACE_HEADER, mockito::Matcher::Any)
            .match_body(mockito::Matcher::Json(json!({"name": "d1"})))
            .with_status(200)
            .create_async()
            .await;

        let client = client_for(&server);
        let response = client
            .execute(&ctx("127.0.0.1"), "directory/create", &json!({"name": "d1"}))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert!(response.body.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_error_with_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/agent/share/create")
            .with_status(500)
            .with_body("disk full")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .execute(&ctx("127.0.0.1"), "share/create", &json!({"name": "s1"}))
            .await
            .unwrap_err();

        match err {
            DispatchError::Status { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "disk full");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = HttpDispatchClient::new(&AgentSettings {
            port: 1,
            timeout_secs: 2,
            ..AgentSettings::default()
        })
        .unwrap();

        let err = client
            .execute(&ctx("127.0.0.1"), "system/info", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Transport { .. }));
    }

    #[test]
    fn test_status_error_maps_to_upstream() {
        let err: DriverError = DispatchError::Status {
            host: "10.0.0.1".to_string(),
            operation: "user/create".to_string(),
            status: 409,
            body: "exists".to_string(),
        }
        .into();
        assert!(matches!(err, DriverError::Upstream { status: Some(409), .. }));
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let long = "x".repeat(BODY_EXCERPT_LEN + 10);
        let cut = excerpt(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.len(), BODY_EXCERPT_LEN + 3);
    }
}
