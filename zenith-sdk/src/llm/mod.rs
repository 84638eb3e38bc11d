//! Language-model providers
//!
//! This module defines the [`LanguageModel`] trait consumed by the Zenith
//! query orchestrator and its HTTP implementations.

use crate::errors::Result;
use async_trait::async_trait;

pub mod gemini;
pub mod ollama;
mod prompts;

pub use gemini::{GeminiClient, GeminiConfig};
pub use ollama::{OllamaClient, OllamaConfig};

/// A text-in, text-out language model used to write and narrate queries
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Translate a question into a query, prefixed with `METRIC:` or `LOG:`
    async fn generate_query(&self, question: &str) -> Result<String>;

    /// Explain the rows returned by `query` in answer to `question`
    async fn explain(&self, question: &str, query: &str, results: &str) -> Result<String>;

    /// Suggest performance improvements from a textual system summary
    async fn generate_recommendations(&self, summary: &str) -> Result<String>;

    /// Short provider name used in logs
    fn name(&self) -> &str;
}
