//! In-memory experience log
//!
//! Rows live in a map guarded by a mutex. Data is lost when the process exits.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::info;

use crate::models::experience::{Experience, NewExperience};

use super::traits::{ExperienceError, ExperienceStore};

#[derive(Default)]
struct Inner {
    rows: BTreeMap<i64, Experience>,
    last_id: i64,
    closed: bool,
}

/// In-memory implementation of ExperienceStore
///
/// Suitable for tests and ephemeral runs.
#[derive(Default)]
pub struct InMemoryExperienceStore {
    inner: Mutex<Inner>,
}

impl InMemoryExperienceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows, including those written before close
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.lock().rows.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every row in id order
    #[cfg(test)]
    pub fn all(&self) -> Vec<Experience> {
        self.inner.lock().rows.values().cloned().collect()
    }
}

#[async_trait]
impl ExperienceStore for InMemoryExperienceStore {
    async fn append(&self, record: NewExperience) -> Result<i64, ExperienceError> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(ExperienceError::Closed);
        }

        inner.last_id += 1;
        let id = inner.last_id;
        let source = record.source;
        inner
            .rows
            .insert(id, Experience::from_new(id, Utc::now(), record));

        info!("Experience logged [id: {}] source: {}", id, source);
        Ok(id)
    }

    async fn set_feedback(&self, id: i64, feedback: i64) -> Result<(), ExperienceError> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(ExperienceError::Closed);
        }

        let row = inner
            .rows
            .get_mut(&id)
            .ok_or(ExperienceError::NotFound(id))?;
        row.user_feedback = feedback;

        info!("Experience feedback updated [id: {}] feedback: {}", id, feedback);
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Option<Experience>, ExperienceError> {
        let inner = self.inner.lock();
        if inner.closed {
            return Err(ExperienceError::Closed);
        }
        Ok(inner.rows.get(&id).cloned())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Experience>, ExperienceError> {
        let inner = self.inner.lock();
        if inner.closed {
            return Err(ExperienceError::Closed);
        }
        Ok(inner.rows.values().rev().take(limit).cloned().collect())
    }

    async fn close(&self) -> Result<(), ExperienceError> {
        self.inner.lock().closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::experience::Source;

    fn record(result: &str) -> NewExperience {
        NewExperience::new(Source::Query, "cpu?", "METRIC: avg(cpu_usage_pct)", result)
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_ids() {
        let store = InMemoryExperienceStore::new();
        let first = store.append(record("Success")).await.unwrap();
        let second = store.append(record("Success")).await.unwrap();

        assert_eq!(first, 1);
        assert!(second > first);

        let row = store.get(first).await.unwrap().unwrap();
        assert_eq!(row.user_feedback, 0);
        assert_eq!(row.execution_result, "Success");
    }

    #[tokio::test]
    async fn test_set_feedback() {
        let store = InMemoryExperienceStore::new();
        let id = store.append(record("Success")).await.unwrap();

        store.set_feedback(id, -1).await.unwrap();
        assert_eq!(store.get(id).await.unwrap().unwrap().user_feedback, -1);

        // overwrite, no history
        store.set_feedback(id, 1).await.unwrap();
        store.set_feedback(id, 1).await.unwrap();
        assert_eq!(store.get(id).await.unwrap().unwrap().user_feedback, 1);
    }

    #[tokio::test]
    async fn test_set_feedback_not_found_mutates_nothing() {
        let store = InMemoryExperienceStore::new();
        let id = store.append(record("Success")).await.unwrap();

        let result = store.set_feedback(id + 100, 1).await;
        assert!(matches!(result, Err(ExperienceError::NotFound(missing)) if missing == id + 100));
        assert!(store.all().iter().all(|row| row.user_feedback == 0));
    }

    #[tokio::test]
    async fn test_recent_is_newest_first() {
        let store = InMemoryExperienceStore::new();
        for i in 0..5 {
            store.append(record(&format!("r{i}"))).await.unwrap();
        }

        let recent = store.recent(2).await.unwrap();
        let results: Vec<_> = recent.iter().map(|r| r.execution_result.as_str()).collect();
        assert_eq!(results, vec!["r4", "r3"]);
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_final() {
        let store = InMemoryExperienceStore::new();
        store.append(record("Success")).await.unwrap();

        store.close().await.unwrap();
        store.close().await.unwrap();

        assert!(matches!(
            store.append(record("Success")).await,
            Err(ExperienceError::Closed)
        ));
        assert_eq!(store.len(), 1);
    }
}
