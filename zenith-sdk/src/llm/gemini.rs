//! Google Gemini provider over the public REST API
//!
//! Uses `models/{model}:generateContent` with the persona sent as a system
//! instruction. Text parts of the first candidate are concatenated. The API
//! key travels in a header so it never appears in request URLs or errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{LanguageModel, prompts};
use crate::errors::{Result, SdkError};
use crate::sanitize::sanitize_generated_query;

const SERVICE: &str = "gemini";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(SdkError::Config("Gemini API key is required".to_string()));
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        debug!(model = %self.config.model, "Sending prompt to Gemini");

        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: prompts::SYSTEM_PERSONA,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SdkError::api(SERVICE, status.as_u16(), body));
        }

        let body: GenerateContentResponse = response.json().await?;
        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(SdkError::EmptyResponse(SERVICE.to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate_query(&self, question: &str) -> Result<String> {
        let raw = self.generate(&prompts::generate_query(question)).await?;
        let query = sanitize_generated_query(&raw);
        if query.is_empty() {
            return Err(SdkError::EmptyResponse(SERVICE.to_string()));
        }
        Ok(query)
    }

    async fn explain(&self, question: &str, query: &str, results: &str) -> Result<String> {
        self.generate(&prompts::explain(question, query, results))
            .await
            .map(|text| text.trim().to_string())
    }

    async fn generate_recommendations(&self, summary: &str) -> Result<String> {
        self.generate(&prompts::recommendations(summary))
            .await
            .map(|text| text.trim().to_string())
    }

    fn name(&self) -> &str {
        SERVICE
    }
}
