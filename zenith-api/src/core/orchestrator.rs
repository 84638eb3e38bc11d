//! Query orchestration
//!
//! Turns one natural-language question into one explained answer. Generation
//! and execution are retried together up to `max_attempts`; explanation runs
//! once. Every execution failure is recorded, while a generation failure is
//! recorded only when it exhausts the attempts.

use std::sync::Arc;
use tracing::{error, info, warn};
use zenith_sdk::{LanguageModel, TelemetryStore};

use crate::core::storage::{ExperienceStore, record};
use crate::models::experience::{NewExperience, Source};
use crate::models::outcome::{Answer, Failure, FailureKind, Outcome};
use crate::utils::parser::{QueryRoute, route_generated_query};

pub const SUCCESS: &str = "Success";

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub max_attempts: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

enum State {
    Generating {
        attempt: u32,
    },
    Executing {
        attempt: u32,
        generated: String,
    },
    Explaining {
        generated: String,
        query: String,
        results: String,
    },
}

pub struct Orchestrator {
    model: Arc<dyn LanguageModel>,
    telemetry: Arc<dyn TelemetryStore>,
    experiences: Arc<dyn ExperienceStore>,
    max_attempts: u32,
}

impl Orchestrator {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        telemetry: Arc<dyn TelemetryStore>,
        experiences: Arc<dyn ExperienceStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            model,
            telemetry,
            experiences,
            max_attempts: config.max_attempts.max(1),
        }
    }

    pub async fn handle(&self, question: &str) -> Outcome {
        let max_attempts = self.max_attempts;
        let mut state = State::Generating { attempt: 1 };

        loop {
            state = match state {
                State::Generating { attempt } => {
                    info!(attempt, max_attempts, "Generating query");
                    match self.model.generate_query(question).await {
                        Ok(generated) => State::Executing { attempt, generated },
                        Err(e) if attempt < max_attempts => {
                            warn!(attempt, max_attempts, "Query generation failed: {}", e);
                            State::Generating {
                                attempt: attempt + 1,
                            }
                        },
                        Err(e) => {
                            error!(attempt, max_attempts, "Query generation failed: {}", e);
                            let interaction_id = self
                                .log(question, "", format!("Failed to generate query: {e}"))
                                .await;
                            return Err(Failure {
                                interaction_id,
                                kind: FailureKind::Generation,
                                message: format!(
                                    "Failed to generate query after {max_attempts} attempts: {e}"
                                ),
                            });
                        },
                    }
                },

                State::Executing { attempt, generated } => {
                    let routed = route_generated_query(&generated);
                    info!(attempt, max_attempts, route = %routed.route, query = routed.query, "Executing query");

                    let executed = match routed.route {
                        QueryRoute::Logs => self.telemetry.query_logs(routed.query).await,
                        QueryRoute::Metrics => self.telemetry.query_metrics(routed.query).await,
                    };

                    match executed {
                        Ok(results) => State::Explaining {
                            query: routed.query.to_string(),
                            generated,
                            results,
                        },
                        Err(e) => {
                            self.log(question, &generated, format!("Execution Error: {e}"))
                                .await;

                            if attempt < max_attempts {
                                warn!(attempt, max_attempts, "Query execution failed: {}", e);
                                State::Generating {
                                    attempt: attempt + 1,
                                }
                            } else {
                                error!(attempt, max_attempts, "Query execution failed: {}", e);
                                let interaction_id = self
                                    .log(
                                        question,
                                        &generated,
                                        format!("Final Execution Error: {e}"),
                                    )
                                    .await;
                                return Err(Failure {
                                    interaction_id,
                                    kind: FailureKind::Execution,
                                    message: format!(
                                        "Failed to execute query after {max_attempts} attempts: {e}"
                                    ),
                                });
                            }
                        },
                    }
                },

                State::Explaining {
                    generated,
                    query,
                    results,
                } => {
                    return match self.model.explain(question, &query, &results).await {
                        Ok(text) => {
                            let interaction_id = self.log(question, &generated, SUCCESS).await;
                            info!(?interaction_id, "Query answered");
                            Ok(Answer {
                                interaction_id,
                                text,
                            })
                        },
                        Err(e) => {
                            error!("Explanation failed: {}", e);
                            let message = format!("Failed to explain results: {e}");
                            let interaction_id =
                                self.log(question, &generated, message.clone()).await;
                            Err(Failure {
                                interaction_id,
                                kind: FailureKind::Explanation,
                                message,
                            })
                        },
                    };
                },
            };
        }
    }

    async fn log(
        &self,
        question: &str,
        generated: &str,
        result: impl Into<String>,
    ) -> Option<i64> {
        record(
            self.experiences.as_ref(),
            NewExperience::new(Source::Query, question, generated, result),
        )
        .await
    }
}
