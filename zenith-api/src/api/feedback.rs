use axum::{Json, extract::State};
use tracing::info;
use zenith_sdk::{FeedbackRequest, FeedbackResponse};

use crate::{
    api::{experiences::ExperienceState, extract::ApiJson},
    models::error::{ApiError, ApiResult},
};

/// Attach a good/bad judgement to a previously returned interaction.
pub async fn submit_feedback(
    State(state): State<ExperienceState>,
    ApiJson(request): ApiJson<FeedbackRequest>,
) -> ApiResult<Json<FeedbackResponse>> {
    if request.interaction_id == 0 {
        return Err(ApiError::BadRequest(
            "interaction_id must be non-zero".to_string(),
        ));
    }

    let score = request.feedback.score().ok_or_else(|| {
        ApiError::BadRequest(format!(
            "invalid feedback '{}': expected \"good\", \"bad\", 1 or -1",
            request.feedback
        ))
    })?;

    state
        .experiences
        .set_feedback(request.interaction_id, score)
        .await?;

    info!(
        "Feedback recorded for interaction {}: {}",
        request.interaction_id, score
    );
    Ok(Json(FeedbackResponse::ok()))
}
