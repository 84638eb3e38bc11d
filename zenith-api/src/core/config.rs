use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_METRIC_QUERIES: [&str; 4] = [
    "avg_over_time(cpu_usage_pct[1h])",
    "avg_over_time(memory_used_mb[1h])",
    "topk(5, avg_over_time(process_cpu_pct[1h]))",
    "topk(5, avg_over_time(process_memory_mb[1h]))",
];

pub const DEFAULT_LOG_QUERIES: [&str; 1] = ["_time:1h messageType:error | limit 20"];

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub experience: ExperienceConfig,
    pub telemetry: TelemetryConfig,
    pub llm: LlmConfig,
    pub orchestrator: OrchestratorSettings,
    #[serde(default)]
    pub recommend: RecommendConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExperienceConfig {
    pub backend: StorageBackend,
    pub db_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelemetryConfig {
    pub metrics_url: String,
    pub logs_url: String,
    pub timeout_seconds: u64,
}

impl TelemetryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LlmConfig {
    pub provider: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub ollama_url: String,
    pub timeout_seconds: u64,
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Configured key, else `GEMINI_API_KEY`. Blank values count as unset.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OrchestratorSettings {
    pub max_attempts: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RecommendConfig {
    pub metric_queries: Vec<String>,
    pub log_queries: Vec<String>,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            metric_queries: DEFAULT_METRIC_QUERIES.iter().map(|q| q.to_string()).collect(),
            log_queries: DEFAULT_LOG_QUERIES.iter().map(|q| q.to_string()).collect(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Self::builder()?
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("ZENITH").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError>
    {
        let defaults = RecommendConfig::default();
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("experience.backend", "sqlite")?
            .set_default("experience.db_path", "data/experiences.db")?
            .set_default("telemetry.metrics_url", "http://localhost:8428")?
            .set_default("telemetry.logs_url", "http://localhost:9428")?
            .set_default("telemetry.timeout_seconds", 10)?
            .set_default("llm.provider", "gemini")?
            .set_default("llm.ollama_url", "http://localhost:11434")?
            .set_default("llm.timeout_seconds", 300)?
            .set_default("orchestrator.max_attempts", 3)?
            .set_default("recommend.metric_queries", defaults.metric_queries)?
            .set_default("recommend.log_queries", defaults.log_queries)
    }

    /// Checks that must pass before the server binds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.llm.provider.as_str() {
            "gemini" => {
                if self.llm.resolved_api_key().is_none() {
                    return Err(ConfigError::Message(
                        "llm.provider is gemini but no API key is set (llm.api_key or GEMINI_API_KEY)"
                            .to_string(),
                    ));
                }
            },
            "ollama" => {},
            other => {
                return Err(ConfigError::Message(format!(
                    "unknown llm.provider '{other}' (expected gemini or ollama)"
                )));
            },
        }

        if self.orchestrator.max_attempts == 0 {
            return Err(ConfigError::Message(
                "orchestrator.max_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Settings {
        Settings::builder().unwrap().build().unwrap().try_deserialize().unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = defaults();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.experience.backend, StorageBackend::Sqlite);
        assert_eq!(settings.experience.db_path, "data/experiences.db");
        assert_eq!(settings.telemetry.metrics_url, "http://localhost:8428");
        assert_eq!(settings.telemetry.logs_url, "http://localhost:9428");
        assert_eq!(settings.llm.provider, "gemini");
        assert!(settings.llm.model.is_none());
        assert_eq!(settings.orchestrator.max_attempts, 3);
        assert_eq!(settings.recommend.metric_queries.len(), 4);
        assert_eq!(
            settings.recommend.log_queries,
            vec!["_time:1h messageType:error | limit 20".to_string()]
        );
    }

    #[test]
    fn test_validate_provider() {
        let mut settings = defaults();
        settings.llm.provider = "ollama".to_string();
        assert!(settings.validate().is_ok());

        settings.llm.provider = "openai".to_string();
        let err = settings.validate().unwrap_err().to_string();
        assert!(err.contains("unknown llm.provider 'openai'"));
    }

    #[test]
    fn test_validate_gemini_key() {
        let mut settings = defaults();
        settings.llm.api_key = Some("test-key".to_string());
        assert!(settings.validate().is_ok());
        assert_eq!(settings.llm.resolved_api_key().as_deref(), Some("test-key"));
    }

    #[test]
    fn test_validate_max_attempts() {
        let mut settings = defaults();
        settings.llm.provider = "ollama".to_string();
        settings.orchestrator.max_attempts = 0;
        assert!(settings.validate().is_err());
    }
}
