use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    api::extract::{ApiPath, ApiQuery},
    core::storage::{ExperienceError, ExperienceStore},
    models::{
        error::{ApiError, ApiResult},
        experience::Experience,
    },
};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

#[derive(Clone)]
pub struct ExperienceState {
    pub experiences: Arc<dyn ExperienceStore>,
}

impl From<ExperienceError> for ApiError {
    fn from(e: ExperienceError) -> Self {
        match e {
            ExperienceError::NotFound(id) => ApiError::NotFound(format!("experience {id}")),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

pub async fn list_experiences(
    State(state): State<ExperienceState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<Experience>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    Ok(Json(state.experiences.recent(limit).await?))
}

pub async fn get_experience(
    State(state): State<ExperienceState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Experience>> {
    state
        .experiences
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ExperienceError::NotFound(id).into())
}
