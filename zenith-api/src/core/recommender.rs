//! Performance recommendations
//!
//! Runs a fixed set of summary queries, hands the combined text to the
//! language model and records one experience for the whole exchange.

use std::sync::Arc;
use tracing::{error, info, warn};
use zenith_sdk::{LanguageModel, TelemetryStore};

use crate::core::config::RecommendConfig;
use crate::core::orchestrator::SUCCESS;
use crate::core::storage::{ExperienceStore, record};
use crate::models::experience::{NewExperience, Source};
use crate::models::outcome::{Answer, Failure, FailureKind, Outcome};

pub const RECOMMEND_PROMPT: &str = "Generate system performance recommendations";

pub struct Recommender {
    model: Arc<dyn LanguageModel>,
    telemetry: Arc<dyn TelemetryStore>,
    experiences: Arc<dyn ExperienceStore>,
    queries: RecommendConfig,
}

impl Recommender {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        telemetry: Arc<dyn TelemetryStore>,
        experiences: Arc<dyn ExperienceStore>,
        queries: RecommendConfig,
    ) -> Self {
        Self {
            model,
            telemetry,
            experiences,
            queries,
        }
    }

    /// Summary queries in execution order, metrics first
    fn all_queries(&self) -> impl Iterator<Item = &str> {
        self.queries
            .metric_queries
            .iter()
            .chain(self.queries.log_queries.iter())
            .map(String::as_str)
    }

    async fn summarize(&self) -> String {
        let mut summary = String::new();

        for query in &self.queries.metric_queries {
            let section = self.telemetry.query_metrics(query).await;
            push_section(&mut summary, "Metrics", query, section);
        }
        for query in &self.queries.log_queries {
            let section = self.telemetry.query_logs(query).await;
            push_section(&mut summary, "Logs", query, section);
        }

        summary
    }

    pub async fn recommend(&self) -> Outcome {
        info!("Generating recommendations");
        let summary = self.summarize().await;
        let generated = self.all_queries().collect::<Vec<_>>().join("\n");

        match self.model.generate_recommendations(&summary).await {
            Ok(text) => {
                let interaction_id = self.log(generated, SUCCESS).await;
                Ok(Answer {
                    interaction_id,
                    text,
                })
            },
            Err(e) => {
                error!("Recommendation generation failed: {}", e);
                let message = format!("Failed to generate recommendations: {e}");
                let interaction_id = self.log(generated, message.clone()).await;
                Err(Failure {
                    interaction_id,
                    kind: FailureKind::Recommendation,
                    message,
                })
            },
        }
    }

    async fn log(&self, generated: String, result: impl Into<String>) -> Option<i64> {
        record(
            self.experiences.as_ref(),
            NewExperience::new(Source::Recommend, RECOMMEND_PROMPT, generated, result),
        )
        .await
    }
}

fn push_section(
    summary: &mut String,
    kind: &str,
    query: &str,
    section: zenith_sdk::Result<String>,
) {
    summary.push_str(&format!("## {kind}: {query}\n"));
    match section {
        Ok(rows) if rows.trim().is_empty() => summary.push_str("(no data)\n"),
        Ok(rows) => {
            summary.push_str(rows.trim_end());
            summary.push('\n');
        },
        Err(e) => {
            warn!(query, "Summary query failed: {}", e);
            summary.push_str(&format!("unavailable: {e}\n"));
        },
    }
    summary.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::InMemoryExperienceStore;
    use zenith_sdk::mock::{ModelCall, ScriptedLanguageModel, ScriptedTelemetryStore, StoreCall};

    fn queries() -> RecommendConfig {
        RecommendConfig {
            metric_queries: vec!["avg(cpu_usage_pct)".to_string(), "avg(memory_used_mb)".to_string()],
            log_queries: vec!["_time:1h messageType:error".to_string()],
        }
    }

    #[tokio::test]
    async fn test_recommend_success() {
        let model = Arc::new(ScriptedLanguageModel::new().queue_recommendation(Ok("Close Chrome.")));
        let telemetry = Arc::new(
            ScriptedTelemetryStore::new()
                .queue_metrics(Ok("Metric: {} Value: [0, 91]"))
                .queue_metrics(Err("connection refused"))
                .queue_logs(Ok("")),
        );
        let experiences = Arc::new(InMemoryExperienceStore::new());
        let recommender =
            Recommender::new(model.clone(), telemetry.clone(), experiences.clone(), queries());

        let answer = recommender.recommend().await.unwrap();
        assert_eq!(answer.text, "Close Chrome.");

        assert_eq!(
            telemetry.calls().await,
            vec![
                StoreCall::Metrics("avg(cpu_usage_pct)".to_string()),
                StoreCall::Metrics("avg(memory_used_mb)".to_string()),
                StoreCall::Logs("_time:1h messageType:error".to_string()),
            ]
        );

        let summary = match &model.calls().await[0] {
            ModelCall::Recommend(summary) => summary.clone(),
            other => panic!("unexpected call: {other:?}"),
        };
        assert!(summary.contains("## Metrics: avg(cpu_usage_pct)\nMetric: {} Value: [0, 91]"));
        assert!(summary.contains("## Metrics: avg(memory_used_mb)\nunavailable: connection refused"));
        assert!(summary.contains("## Logs: _time:1h messageType:error\n(no data)"));

        let rows = experiences.all();
        assert_eq!(rows.len(), 1);
        assert_eq!(answer.interaction_id, Some(rows[0].id));
        assert_eq!(rows[0].source, Source::Recommend);
        assert_eq!(rows[0].prompt, RECOMMEND_PROMPT);
        assert_eq!(
            rows[0].generated_query,
            "avg(cpu_usage_pct)\navg(memory_used_mb)\n_time:1h messageType:error"
        );
        assert_eq!(rows[0].execution_result, "Success");
    }

    #[tokio::test]
    async fn test_recommend_failure() {
        let experiences = Arc::new(InMemoryExperienceStore::new());
        let recommender = Recommender::new(
            Arc::new(ScriptedLanguageModel::new().queue_recommendation(Err("model offline"))),
            Arc::new(ScriptedTelemetryStore::new()),
            experiences.clone(),
            queries(),
        );

        let failure = recommender.recommend().await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::Recommendation);
        assert_eq!(failure.message, "Failed to generate recommendations: model offline");

        let rows = experiences.all();
        assert_eq!(rows.len(), 1);
        assert_eq!(failure.interaction_id, Some(rows[0].id));
        assert_eq!(rows[0].execution_result, failure.message);
    }
}
