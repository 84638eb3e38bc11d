use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::{info, warn};
use zenith_sdk::{QueryRequest, QueryResponse};

use crate::{
    api::extract::ApiJson,
    core::orchestrator::Orchestrator,
    models::{
        error::{ApiError, ApiResult},
        outcome::into_response,
    },
};

#[derive(Clone)]
pub struct QueryState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Answer one question. Orchestration failures are reported in the body,
/// not as HTTP errors.
pub async fn handle_query(
    State(state): State<QueryState>,
    ApiJson(request): ApiJson<QueryRequest>,
) -> ApiResult<Json<QueryResponse>> {
    let question = request.query.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    info!("Received query: {}", question);
    let outcome = state.orchestrator.handle(question).await;
    if let Err(failure) = &outcome {
        warn!(kind = ?failure.kind, "Query not answered: {}", failure.message);
    }
    Ok(Json(into_response(outcome)))
}
