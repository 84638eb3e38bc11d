//! Ollama provider (`POST /api/generate`, non-streaming)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{LanguageModel, prompts};
use crate::errors::{Result, SdkError};
use crate::sanitize::sanitize_generated_query;

const SERVICE: &str = "ollama";

/// Connection settings for a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "phi4-mini".to_string(),
            timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

pub struct OllamaClient {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.base_url.trim_end_matches('/'));
        debug!(model = %self.config.model, "Sending prompt to Ollama");

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.config.model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SdkError::api(SERVICE, status.as_u16(), body));
        }

        let body: GenerateResponse = response.json().await?;
        if let Some(error) = body.error.filter(|e| !e.is_empty()) {
            return Err(SdkError::backend(SERVICE, error));
        }
        Ok(body.response)
    }
}

fn non_empty(text: String) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SdkError::EmptyResponse(SERVICE.to_string()));
    }
    Ok(text.to_string())
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn generate_query(&self, question: &str) -> Result<String> {
        let raw = self.generate(&prompts::generate_query(question)).await?;
        let query = sanitize_generated_query(&raw);
        if query.is_empty() {
            return Err(SdkError::EmptyResponse(SERVICE.to_string()));
        }
        Ok(query)
    }

    async fn explain(&self, question: &str, query: &str, results: &str) -> Result<String> {
        let text = self.generate(&prompts::explain(question, query, results)).await?;
        non_empty(text)
    }

    async fn generate_recommendations(&self, summary: &str) -> Result<String> {
        let text = self.generate(&prompts::recommendations(summary)).await?;
        non_empty(text)
    }

    fn name(&self) -> &str {
        SERVICE
    }
}
