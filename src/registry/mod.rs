use async_trait::async_trait;

use crate::core::models::{Container, ContainerListing, Host, Operation};
use crate::errors::DispatchResult;

pub mod containers;
pub mod hosts;
pub mod operations;

pub use containers::PostgresContainerRegistry;
pub use hosts::PostgresHostRegistry;
pub use operations::PostgresOperationLog;

/// Read-only access to the host pool. `Ok(None)` means the host is absent,
/// which callers treat differently from a storage failure.
#[async_trait]
pub trait HostRegistry: Send + Sync {
    async fn get(&self, id: &str) -> DispatchResult<Option<Host>>;

    /// Resolve a host by its network address. The metrics provider
    /// identifies hosts by address only, so create goes through here.
    async fn get_by_address(&self, address: &str) -> DispatchResult<Option<Host>>;
}

/// Single source of truth for host assignment. Every successful write is
/// durable before the call returns; the create workflow depends on the row
/// existing as a recovery marker when the remote call fails afterwards.
#[async_trait]
pub trait ContainerRegistry: Send + Sync {
    async fn insert(&self, container: &Container) -> DispatchResult<()>;

    async fn get(&self, id: &str) -> DispatchResult<Option<Container>>;

    /// Returns false when no row matched.
    async fn delete(&self, id: &str) -> DispatchResult<bool>;

    async fn list_joined(&self) -> DispatchResult<Vec<ContainerListing>>;
}

/// Append-only audit trail of remote action outcomes.
#[async_trait]
pub trait OperationLog: Send + Sync {
    async fn append(&self, operation: &Operation) -> DispatchResult<()>;
}
