//! Startup wiring
//!
//! Collaborators are constructed once from settings and passed explicitly to
//! the orchestrator and recommender.

use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tracing::info;
use zenith_sdk::{
    GeminiClient, GeminiConfig, LanguageModel, OllamaClient, OllamaConfig, TelemetryStore,
    VictoriaClient, VictoriaConfig,
};

use crate::core::config::{
    ExperienceConfig, LlmConfig, RecommendConfig, Settings, StorageBackend, TelemetryConfig,
};
use crate::core::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::core::recommender::Recommender;
use crate::core::storage::{ExperienceStore, InMemoryExperienceStore, SqliteExperienceStore};

#[derive(Clone)]
pub struct Components {
    pub orchestrator: Arc<Orchestrator>,
    pub recommender: Arc<Recommender>,
    pub experiences: Arc<dyn ExperienceStore>,
}

impl Components {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        telemetry: Arc<dyn TelemetryStore>,
        experiences: Arc<dyn ExperienceStore>,
        orchestrator: OrchestratorConfig,
        summary_queries: RecommendConfig,
    ) -> Self {
        let orchestrator =
            Orchestrator::new(model.clone(), telemetry.clone(), experiences.clone(), orchestrator);
        let recommender = Recommender::new(model, telemetry, experiences.clone(), summary_queries);

        Self {
            orchestrator: Arc::new(orchestrator),
            recommender: Arc::new(recommender),
            experiences,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let model = language_model(&settings.llm)?;
        let telemetry = telemetry_store(&settings.telemetry)?;
        let experiences = experience_store(&settings.experience)?;
        Ok(Self::new(
            model,
            telemetry,
            experiences,
            OrchestratorConfig {
                max_attempts: settings.orchestrator.max_attempts,
            },
            settings.recommend.clone(),
        ))
    }
}

pub fn language_model(config: &LlmConfig) -> Result<Arc<dyn LanguageModel>> {
    let model: Arc<dyn LanguageModel> = match config.provider.as_str() {
        "gemini" => {
            let api_key = config
                .resolved_api_key()
                .context("Gemini provider requires an API key")?;
            let mut gemini = GeminiConfig::new(api_key);
            if let Some(model) = &config.model {
                gemini.model = model.clone();
            }
            gemini.timeout = config.timeout();
            Arc::new(GeminiClient::new(gemini)?)
        },
        "ollama" => {
            let defaults = OllamaConfig::default();
            Arc::new(OllamaClient::new(OllamaConfig {
                base_url: config.ollama_url.clone(),
                model: config.model.clone().unwrap_or(defaults.model),
                timeout: config.timeout(),
            })?)
        },
        other => bail!("unknown llm provider: {other}"),
    };

    info!("Language model provider: {}", model.name());
    Ok(model)
}

pub fn telemetry_store(config: &TelemetryConfig) -> Result<Arc<dyn TelemetryStore>> {
    let client = VictoriaClient::new(VictoriaConfig {
        metrics_url: config.metrics_url.clone(),
        logs_url: config.logs_url.clone(),
        timeout: config.timeout(),
    })?;
    info!(
        "Telemetry store: metrics at {}, logs at {}",
        config.metrics_url, config.logs_url
    );
    Ok(Arc::new(client))
}

pub fn experience_store(config: &ExperienceConfig) -> Result<Arc<dyn ExperienceStore>> {
    Ok(match config.backend {
        StorageBackend::Sqlite => Arc::new(
            SqliteExperienceStore::open(&config.db_path)
                .with_context(|| format!("failed to open experience log at {}", config.db_path))?,
        ),
        StorageBackend::Memory => {
            info!("Experience log kept in memory");
            Arc::new(InMemoryExperienceStore::new())
        },
    })
}
