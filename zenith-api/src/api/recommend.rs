use axum::{Json, extract::State};
use std::sync::Arc;
use zenith_sdk::QueryResponse;

use crate::{core::recommender::Recommender, models::outcome::into_response};

#[derive(Clone)]
pub struct RecommendState {
    pub recommender: Arc<Recommender>,
}

pub async fn recommend(State(state): State<RecommendState>) -> Json<QueryResponse> {
    Json(into_response(state.recommender.recommend().await))
}
