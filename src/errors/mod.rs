use thiserror::Error;

/// Workflow-level failure taxonomy. Every variant maps to a distinct
/// caller-visible condition; none of them are retried by the core.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("host not found: {0}")]
    HostNotFound(String),

    #[error("container not found: {0}")]
    ContainerNotFound(String),

    #[error("container already exists: {0}")]
    Conflict(String),

    #[error("no host available for scheduling")]
    NoCapacity,

    #[error("metrics provider unavailable: {0}")]
    MetricsUnavailable(String),

    #[error("persistence failure: {0}")]
    Persistence(String),

    #[error("agent unreachable at {address}: {message}")]
    Transport { address: String, message: String },

    #[error("bad agent response from {address}: {message}")]
    Protocol { address: String, message: String },

    // A container row pointing at a host that no longer exists. Fatal for
    // the request, not for the process.
    #[error("container {container} references missing host {host}")]
    Inconsistent { container: String, host: String },
}

impl From<sqlx::Error> for DispatchError {
    fn from(err: sqlx::Error) -> Self {
        DispatchError::Persistence(err.to_string())
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;
