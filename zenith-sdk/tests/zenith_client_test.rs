//! ZenithClient against a fake Zenith server

use axum::{Json, Router, http::StatusCode, routing::get, routing::post};
use serde_json::{Value, json};
use zenith_sdk::{FeedbackValue, SdkError, ZenithClient};

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn app() -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/query",
            post(|Json(body): Json<Value>| async move {
                if body["query"] == "broken" {
                    Json(json!({"interaction_id": 9, "error": "Failed to generate query after 3 attempts: timeout"}))
                } else {
                    Json(json!({"interaction_id": 4, "answer": "Average CPU is 12.5%."}))
                }
            }),
        )
        .route(
            "/feedback",
            post(|Json(body): Json<Value>| async move {
                if body["interaction_id"] == 4 && body["feedback"] == "good" {
                    (StatusCode::OK, Json(json!({"status": "ok"})))
                } else {
                    (
                        StatusCode::NOT_FOUND,
                        Json(json!({"error": "interaction 5 not found"})),
                    )
                }
            }),
        )
}

#[tokio::test]
async fn test_query_answer_and_error() {
    let client = ZenithClient::new(spawn(app()).await).unwrap();

    let ok = client.query("cpu?").await.unwrap();
    assert_eq!(ok.interaction_id, Some(4));
    assert_eq!(ok.answer.as_deref(), Some("Average CPU is 12.5%."));
    assert!(!ok.is_error());

    let failed = client.query("broken").await.unwrap();
    assert_eq!(failed.interaction_id, Some(9));
    assert!(failed.is_error());
}

#[tokio::test]
async fn test_feedback_round_trip_and_not_found() {
    let client = ZenithClient::new(spawn(app()).await).unwrap();

    let ack = client.feedback(4, FeedbackValue::good()).await.unwrap();
    assert_eq!(ack.status, "ok");

    let err = client.feedback(5, FeedbackValue::bad()).await.unwrap_err();
    match err {
        SdkError::Api { status, body, .. } => {
            assert_eq!(status, 404);
            assert_eq!(body, "interaction 5 not found");
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_health() {
    let client = ZenithClient::new(spawn(app()).await).unwrap();
    assert!(client.health().await.unwrap());
}
