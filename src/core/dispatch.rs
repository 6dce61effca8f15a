use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::agent::{AgentClient, CONTAINER_PATH, UPDATE_STATE_PATH};
use crate::core::models::{Container, ContainerListing, Host, Operation};
use crate::errors::{DispatchError, DispatchResult};
use crate::monitoring::MetricsProvider;
use crate::registry::{ContainerRegistry, HostRegistry, OperationLog};

/// Caller's container spec, forwarded as-is to the selected host's agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContainerRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub container_type: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub alias: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStateRequest {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub state: StateChange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateChange {
    pub action: String,
    #[serde(default)]
    pub timeout: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteContainerRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// The dispatch core. Holds the registry, metrics and agent handles,
/// assembled once at startup and shared across request tasks; all
/// cross-request state lives behind these handles.
///
/// Every workflow resolves registry state strictly before any remote call.
/// Only create persists intent before dispatching, because no prior row
/// exists there to encode it.
pub struct Dispatcher {
    hosts: Arc<dyn HostRegistry>,
    containers: Arc<dyn ContainerRegistry>,
    operations: Arc<dyn OperationLog>,
    metrics: Arc<dyn MetricsProvider>,
    agent: Arc<dyn AgentClient>,
}

impl Dispatcher {
    pub fn new(
        hosts: Arc<dyn HostRegistry>,
        containers: Arc<dyn ContainerRegistry>,
        operations: Arc<dyn OperationLog>,
        metrics: Arc<dyn MetricsProvider>,
        agent: Arc<dyn AgentClient>,
    ) -> Self {
        Self {
            hosts,
            containers,
            operations,
            metrics,
            agent,
        }
    }

    /// Create workflow: pick host by load, persist intent, dispatch, record
    /// the outcome.
    pub async fn create(&self, request: CreateContainerRequest) -> DispatchResult<Operation> {
        let pick = self
            .metrics
            .least_loaded_host()
            .await?
            .ok_or(DispatchError::NoCapacity)?;

        let host = self
            .hosts
            .get_by_address(&pick.address)
            .await?
            .ok_or_else(|| DispatchError::HostNotFound(pick.address.clone()))?;

        let container = Container {
            id: Uuid::new_v4().to_string(),
            host_id: host.id.clone(),
            name: request.name.clone(),
            container_type: request.container_type.clone(),
            alias: request.alias.clone(),
            deployed: true,
        };

        // Durable intent record, written before the agent is contacted. If
        // the remote call fails this row stays behind so operational tooling
        // can find the dangling remote request.
        self.containers.insert(&container).await?;

        info!(
            container = %container.id,
            host = %host.id,
            address = %host.address,
            load = pick.load,
            "dispatching container create"
        );

        let payload = encode(&request)?;
        let mut operation = match self
            .agent
            .execute(Method::POST, &host.address, CONTAINER_PATH, &payload)
            .await
        {
            Ok(operation) => operation,
            Err(e) => {
                warn!(
                    container = %container.id,
                    host = %host.address,
                    error = %e,
                    "create dispatch failed; container row retained for reconciliation"
                );
                return Err(e);
            }
        };

        operation.container_id = Some(container.id.clone());
        if let Err(e) = self.operations.append(&operation).await {
            // The remote create already succeeded; an audit gap never
            // unwinds it.
            warn!(
                container = %container.id,
                operation = %operation.id,
                error = %e,
                "failed to record operation for successful create"
            );
        }

        Ok(operation)
    }

    /// Pure join query; no state transitions, no remote calls.
    pub async fn list(&self) -> DispatchResult<Vec<ContainerListing>> {
        self.containers.list_joined().await
    }

    /// Forward a start/stop/restart request to the owning host. Runtime
    /// state is authoritative on the agent side; nothing local changes.
    pub async fn update_state(&self, request: UpdateStateRequest) -> DispatchResult<Operation> {
        let (container, host) = self.resolve(&request.id).await?;

        let payload = encode(&request)?;
        let mut operation = self
            .agent
            .execute(Method::POST, &host.address, UPDATE_STATE_PATH, &payload)
            .await?;

        operation.container_id = Some(container.id);
        Ok(operation)
    }

    /// Delete workflow: the local row is removed only after the agent
    /// reports success. Removing it first would lose the only handle for
    /// retrying against the still-live remote container.
    pub async fn delete(&self, request: DeleteContainerRequest) -> DispatchResult<Operation> {
        let (container, host) = self.resolve(&request.id).await?;

        // The registry's name is authoritative for the agent-side lookup.
        let payload = encode(&DeleteContainerRequest {
            id: container.id.clone(),
            name: container.name.clone(),
        })?;

        let mut operation = match self
            .agent
            .execute(Method::DELETE, &host.address, CONTAINER_PATH, &payload)
            .await
        {
            Ok(operation) => operation,
            Err(e) => {
                warn!(
                    container = %container.id,
                    host = %host.address,
                    error = %e,
                    "delete dispatch failed; container row retained so the delete can be retried"
                );
                return Err(e);
            }
        };

        if !self.containers.delete(&container.id).await? {
            warn!(container = %container.id, "container row already removed");
        }

        operation.container_id = Some(container.id);
        Ok(operation)
    }

    async fn resolve(&self, id: &str) -> DispatchResult<(Container, Host)> {
        let container = self
            .containers
            .get(id)
            .await?
            .ok_or_else(|| DispatchError::ContainerNotFound(id.to_string()))?;

        // A container always references a resolved host; absence here is a
        // data-integrity violation, not a routine miss.
        let host = self
            .hosts
            .get(&container.host_id)
            .await?
            .ok_or_else(|| DispatchError::Inconsistent {
                container: container.id.clone(),
                host: container.host_id.clone(),
            })?;

        Ok((container, host))
    }
}

fn encode<T: Serialize>(value: &T) -> DispatchResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| DispatchError::Persistence(format!("failed to encode agent payload: {}", e)))
}
