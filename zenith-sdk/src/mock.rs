//! Scripted in-memory collaborators for testing and local simulations
//!
//! Each double replays queued outcomes in order and records every call so
//! tests can assert on what the consumer asked for.

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

use crate::errors::{Result, SdkError};
use crate::llm::LanguageModel;
use crate::telemetry::TelemetryStore;

type Outcome = std::result::Result<String, String>;

fn replay(outcome: Option<Outcome>, exhausted: &str) -> Result<String> {
    match outcome {
        Some(Ok(text)) => Ok(text),
        Some(Err(message)) => Err(SdkError::Scripted(message)),
        None => Err(SdkError::Scripted(exhausted.to_string())),
    }
}

fn to_outcome(outcome: std::result::Result<&str, &str>) -> Outcome {
    outcome.map(str::to_string).map_err(str::to_string)
}

/// A call received by [`ScriptedLanguageModel`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelCall {
    GenerateQuery(String),
    Explain {
        question: String,
        query: String,
        results: String,
    },
    Recommend(String),
}

/// Language model that replays queued outcomes
///
/// An exhausted queue yields an error.
#[derive(Default)]
pub struct ScriptedLanguageModel {
    queries: Mutex<VecDeque<Outcome>>,
    explanations: Mutex<VecDeque<Outcome>>,
    recommendations: Mutex<VecDeque<Outcome>>,
    calls: Mutex<Vec<ModelCall>>,
}

impl ScriptedLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next `generate_query` outcome
    pub fn queue_query(mut self, outcome: std::result::Result<&str, &str>) -> Self {
        self.queries.get_mut().push_back(to_outcome(outcome));
        self
    }

    /// Queue the next `explain` outcome
    pub fn queue_explanation(mut self, outcome: std::result::Result<&str, &str>) -> Self {
        self.explanations.get_mut().push_back(to_outcome(outcome));
        self
    }

    /// Queue the next `generate_recommendations` outcome
    pub fn queue_recommendation(mut self, outcome: std::result::Result<&str, &str>) -> Self {
        self.recommendations.get_mut().push_back(to_outcome(outcome));
        self
    }

    /// Every call received so far, in order
    pub async fn calls(&self) -> Vec<ModelCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLanguageModel {
    async fn generate_query(&self, question: &str) -> Result<String> {
        self.calls
            .lock()
            .await
            .push(ModelCall::GenerateQuery(question.to_string()));
        replay(self.queries.lock().await.pop_front(), "no scripted query")
    }

    async fn explain(&self, question: &str, query: &str, results: &str) -> Result<String> {
        self.calls.lock().await.push(ModelCall::Explain {
            question: question.to_string(),
            query: query.to_string(),
            results: results.to_string(),
        });
        replay(
            self.explanations.lock().await.pop_front(),
            "no scripted explanation",
        )
    }

    async fn generate_recommendations(&self, summary: &str) -> Result<String> {
        self.calls
            .lock()
            .await
            .push(ModelCall::Recommend(summary.to_string()));
        replay(
            self.recommendations.lock().await.pop_front(),
            "no scripted recommendation",
        )
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A call received by [`ScriptedTelemetryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Metrics(String),
    Logs(String),
}

/// Telemetry store that replays queued outcomes
///
/// An exhausted queue yields an empty result set.
#[derive(Default)]
pub struct ScriptedTelemetryStore {
    metrics: Mutex<VecDeque<Outcome>>,
    logs: Mutex<VecDeque<Outcome>>,
    calls: Mutex<Vec<StoreCall>>,
}

impl ScriptedTelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next `query_metrics` outcome
    pub fn queue_metrics(mut self, outcome: std::result::Result<&str, &str>) -> Self {
        self.metrics.get_mut().push_back(to_outcome(outcome));
        self
    }

    /// Queue the next `query_logs` outcome
    pub fn queue_logs(mut self, outcome: std::result::Result<&str, &str>) -> Self {
        self.logs.get_mut().push_back(to_outcome(outcome));
        self
    }

    /// Every call received so far, in order
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl TelemetryStore for ScriptedTelemetryStore {
    async fn query_metrics(&self, query: &str) -> Result<String> {
        self.calls
            .lock()
            .await
            .push(StoreCall::Metrics(query.to_string()));
        self.metrics
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
            .map_err(SdkError::Scripted)
    }

    async fn query_logs(&self, query: &str) -> Result<String> {
        self.calls.lock().await.push(StoreCall::Logs(query.to_string()));
        self.logs
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
            .map_err(SdkError::Scripted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_model_replays_in_order_then_errors() {
        let model = ScriptedLanguageModel::new()
            .queue_query(Err("timeout"))
            .queue_query(Ok("METRIC: up"));

        assert_eq!(
            model.generate_query("q").await.unwrap_err().to_string(),
            "timeout"
        );
        assert_eq!(model.generate_query("q").await.unwrap(), "METRIC: up");
        assert!(model.generate_query("q").await.is_err());
        assert_eq!(model.calls().await.len(), 3);
    }

    #[tokio::test]
    async fn test_store_defaults_to_empty_rows() {
        let store = ScriptedTelemetryStore::new().queue_logs(Err("syntax error"));

        assert_eq!(store.query_metrics("up").await.unwrap(), "");
        assert_eq!(
            store.query_logs("x").await.unwrap_err().to_string(),
            "syntax error"
        );
        assert_eq!(
            store.calls().await,
            vec![
                StoreCall::Metrics("up".to_string()),
                StoreCall::Logs("x".to_string())
            ]
        );
    }
}
