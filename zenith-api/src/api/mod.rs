use axum::{
    Router,
    http::Uri,
    middleware,
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::core::providers::Components;
use crate::middleware::{error_handler, request_id};
use crate::models::error::ApiError;

pub mod experiences;
pub mod extract;
pub mod feedback;
pub mod query;
pub mod recommend;


pub fn create_app(components: Components) -> Router {
    let query_state = query::QueryState {
        orchestrator: components.orchestrator.clone(),
    };

    let recommend_state = recommend::RecommendState {
        recommender: components.recommender.clone(),
    };

    let experience_state = experiences::ExperienceState {
        experiences: components.experiences.clone(),
    };

    let query_routes = Router::new()
        .route("/query", post(query::handle_query))
        .with_state(query_state);

    let recommend_routes = Router::new()
        .route(
            "/recommend",
            get(recommend::recommend).post(recommend::recommend),
        )
        .with_state(recommend_state);

    let experience_routes = Router::new()
        .route("/feedback", post(feedback::submit_feedback))
        .route("/experiences", get(experiences::list_experiences))
        .route("/experiences/:id", get(experiences::get_experience))
        .with_state(experience_state);

    Router::new()
        .route("/health", get(health_check))
        .merge(query_routes)
        .merge(recommend_routes)
        .merge(experience_routes)
        .fallback(not_found)
        .layer(middleware::from_fn(error_handler::handle_errors))
        .layer(CatchPanicLayer::custom(error_handler::handle_panic))
        .layer(TraceLayer::new_for_http())
        // Wraps tracing and error logging so both see the id
        .layer(middleware::from_fn(request_id::add_request_id))
        .layer(CorsLayer::permissive())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
