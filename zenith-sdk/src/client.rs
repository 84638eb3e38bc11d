//! HTTP client for a running Zenith server

use std::time::Duration;

use crate::errors::{Result, SdkError};
use crate::types::{FeedbackRequest, FeedbackResponse, FeedbackValue, QueryRequest, QueryResponse};

const SERVICE: &str = "zenith";

/// Thin client over the Zenith HTTP API
///
/// Orchestration failures come back as a [`QueryResponse`] with `error` set,
/// not as an `Err`; only transport and HTTP-level failures are errors.
#[derive(Clone)]
pub struct ZenithClient {
    client: reqwest::Client,
    base_url: String,
}

impl ZenithClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        // explanation round-trips can take several model calls
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(600))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask a question
    pub async fn query(&self, question: &str) -> Result<QueryResponse> {
        let response = self
            .client
            .post(format!("{}/query", self.base_url))
            .json(&QueryRequest {
                query: question.to_string(),
            })
            .send()
            .await?;
        decode(response).await
    }

    /// Request performance recommendations
    pub async fn recommend(&self) -> Result<QueryResponse> {
        let response = self
            .client
            .post(format!("{}/recommend", self.base_url))
            .send()
            .await?;
        decode(response).await
    }

    /// Attach feedback to an earlier interaction
    pub async fn feedback(
        &self,
        interaction_id: i64,
        feedback: FeedbackValue,
    ) -> Result<FeedbackResponse> {
        let response = self
            .client
            .post(format!("{}/feedback", self.base_url))
            .json(&FeedbackRequest {
                interaction_id,
                feedback,
            })
            .send()
            .await?;
        decode(response).await
    }

    /// Check that the server is up
    pub async fn health(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(response.status().is_success())
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        // the server reports failures as {"error": "..."}
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);
        return Err(SdkError::api(SERVICE, status.as_u16(), message));
    }
    Ok(serde_json::from_str(&body)?)
}
