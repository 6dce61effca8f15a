use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde_json::Value;

use crate::config::AgentSettings;
use crate::core::models::Operation;
use crate::errors::{DispatchError, DispatchResult};

/// Agent-side route shapes, parameterized only by host address.
pub const CONTAINER_PATH: &str = "/api/v1/container";
pub const UPDATE_STATE_PATH: &str = "/api/v1/container/updatestate";

/// The seam between the dispatch core and the per-host agents. Exactly one
/// method so a test double can stand in without any network activity.
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn execute(
        &self,
        method: Method,
        address: &str,
        path: &str,
        payload: &Value,
    ) -> DispatchResult<Operation>;
}

pub struct HttpAgentClient {
    http: reqwest::Client,
    port: u16,
}

impl HttpAgentClient {
    pub fn new(settings: &AgentSettings) -> anyhow::Result<Self> {
        // The hard timeout keeps a stalled agent from pinning a request
        // handler indefinitely.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            port: settings.port,
        })
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn execute(
        &self,
        method: Method,
        address: &str,
        path: &str,
        payload: &Value,
    ) -> DispatchResult<Operation> {
        let url = format!("http://{}:{}{}", address, self.port, path);

        let response = self
            .http
            .request(method, &url)
            .json(payload)
            .send()
            .await
            .map_err(|e| DispatchError::Transport {
                address: address.to_string(),
                message: e.to_string(),
            })?;

        let body: Value = response.json().await.map_err(|e| {
            if e.is_decode() {
                DispatchError::Protocol {
                    address: address.to_string(),
                    message: e.to_string(),
                }
            } else {
                DispatchError::Transport {
                    address: address.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        operation_from_body(address, body)
    }
}

/// An agent response without an operation id is an incompatible agent, not
/// a flaky network.
fn operation_from_body(address: &str, body: Value) -> DispatchResult<Operation> {
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| DispatchError::Protocol {
            address: address.to_string(),
            message: "operation id missing in agent response".to_string(),
        })?
        .to_string();

    let status = body
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(Operation {
        id,
        container_id: None,
        status,
        payload: body,
        recorded_at: Utc::now(),
    })
}
