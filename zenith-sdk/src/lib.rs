//! # Zenith SDK
//!
//! Clients and contracts for the collaborators of the Zenith telemetry
//! assistant:
//!
//! - **Language models**: the [`LanguageModel`] trait with Gemini and Ollama
//!   implementations
//! - **Telemetry stores**: the [`TelemetryStore`] trait with a
//!   VictoriaMetrics/VictoriaLogs implementation
//! - **Zenith service**: [`ZenithClient`] and the wire types it exchanges
//! - **Test doubles**: scripted collaborators in [`mock`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zenith_sdk::{ZenithClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = ZenithClient::new("http://localhost:8080")?;
//!     let response = client.query("What is the average CPU usage?").await?;
//!     println!("{:?}", response.answer);
//!     Ok(())
//! }
//! ```

mod client;
mod errors;
pub mod llm;
pub mod mock;
mod sanitize;
pub mod telemetry;
mod types;

pub use client::ZenithClient;
pub use errors::{Result, SdkError};
pub use llm::{GeminiClient, GeminiConfig, LanguageModel, OllamaClient, OllamaConfig};
pub use sanitize::sanitize_generated_query;
pub use telemetry::{LogEntry, TelemetryStore, VictoriaClient, VictoriaConfig};
pub use types::{FeedbackRequest, FeedbackResponse, FeedbackValue, QueryRequest, QueryResponse};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LanguageModel, Result, SdkError, TelemetryStore, ZenithClient};
}
