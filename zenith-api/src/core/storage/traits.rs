//! Storage trait definitions
//!
//! The experience log is append-only except for `user_feedback`. Backends
//! assign row identity and timestamps; callers only supply field values.

use async_trait::async_trait;
use tracing::error;

use crate::models::experience::{Experience, NewExperience};

#[derive(Debug, thiserror::Error)]
pub enum ExperienceError {
    #[error("experience {0} not found")]
    NotFound(i64),

    #[error("experience log is closed")]
    Closed,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("storage task failed: {0}")]
    Join(String),
}

/// Trait for experience log backends
///
/// Implementations must be thread-safe (Send + Sync) and serialize
/// concurrent writers so ids stay unique and increasing.
#[async_trait]
pub trait ExperienceStore: Send + Sync {
    /// Append a row with no feedback and return its id
    async fn append(&self, record: NewExperience) -> Result<i64, ExperienceError>;

    /// Overwrite the feedback of an existing row
    async fn set_feedback(&self, id: i64, feedback: i64) -> Result<(), ExperienceError>;

    /// Get a row by id
    async fn get(&self, id: i64) -> Result<Option<Experience>, ExperienceError>;

    /// Most recent rows, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<Experience>, ExperienceError>;

    /// Release the underlying storage. Idempotent.
    async fn close(&self) -> Result<(), ExperienceError>;
}

/// Append a row, degrading a storage failure to a missing interaction id.
pub async fn record(store: &dyn ExperienceStore, record: NewExperience) -> Option<i64> {
    let source = record.source;
    match store.append(record).await {
        Ok(id) => Some(id),
        Err(e) => {
            error!(%source, "Failed to record experience: {}", e);
            None
        },
    }
}
