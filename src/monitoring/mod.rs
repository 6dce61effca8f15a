use async_trait::async_trait;

use crate::errors::DispatchResult;

pub mod prometheus;

pub use prometheus::PrometheusMetricsProvider;

/// One host's advisory load at the instant of the query. A snapshot, not a
/// reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct HostLoad {
    pub address: String,
    pub load: f64,
}

/// External capability supplying per-host load. The core never learns how
/// load is computed; it only requires a deterministic pick so identical
/// load states reproduce the same selection.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// `Ok(None)` means no hosts are available and must short-circuit the
    /// create workflow before any registry write.
    async fn least_loaded_host(&self) -> DispatchResult<Option<HostLoad>>;
}
