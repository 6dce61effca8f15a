use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A hypervisor machine running an agent. Registered out-of-band; the
/// dispatch core only ever reads these rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Host {
    pub id: String,
    pub address: String,
    pub name: String,
}

/// A logical workload instance bound to exactly one host. The row is the
/// durable intent record: it is written before the remote create call and
/// survives a failed one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Container {
    pub id: String,
    pub host_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub container_type: String,
    pub alias: String,
    pub deployed: bool,
}

/// Denormalized container/host row for the enumeration endpoint.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContainerListing {
    pub id: String,
    pub host_name: String,
    pub container_name: String,
    pub image: String,
    pub status: String,
}

/// Outcome of a single remote action, as reported by the agent. Stamped
/// with the initiating container id and appended to the audit log; never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Operation {
    pub id: String,
    pub container_id: Option<String>,
    pub status: Option<String>,
    pub payload: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}
