//! Telemetry store abstractions
//!
//! The orchestrator only reads from the store, so [`TelemetryStore`] carries
//! the two query operations. Writers use [`VictoriaClient`] directly.

use crate::errors::Result;
use async_trait::async_trait;

pub mod victoria;

pub use victoria::{LogEntry, VictoriaClient, VictoriaConfig};

/// Read side of the time-series/log backend
///
/// Both operations return a flattened, line-oriented rendering of the result
/// rows suitable for a prompt. An empty result set is an empty string, not an
/// error.
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// Run a MetricsQL expression
    async fn query_metrics(&self, query: &str) -> Result<String>;

    /// Run a LogsQL expression
    async fn query_logs(&self, query: &str) -> Result<String>;
}
