use serde::Deserialize;
use std::time::Duration;

use crate::domain::{AgentMode, ChunkingConfig, DomainError, SimilarityMetric};
use crate::infrastructure::retry::RetryConfig;

/// Environment variable consulted when `provider.api_key` is unset
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub provider: ProviderConfig,
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub agent: AgentConfig,
    pub judge: JudgeConfig,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// OpenAI-compatible endpoint shared by chat and embedding calls
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Bound on every external call
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub batch_size: usize,
    pub metric: SimilarityMetric,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub mode: AgentMode,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_iterations: usize,
}

/// How faithfulness and groundedness are requested from the judge model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeStrategy {
    /// One call per dimension
    #[default]
    Independent,
    /// Faithfulness and groundedness share one structured call
    Combined,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JudgeConfig {
    #[serde(default = "default_judge_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_judge_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub strategy: JudgeStrategy,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_judge_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_judge_max_tokens() -> u32 {
    64
}

fn default_parallel() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured key, else the `OPENAI_API_KEY` environment variable
    pub fn resolved_api_key(&self) -> Result<String, DomainError> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "no API key: set provider.api_key or {}",
                    API_KEY_ENV
                ))
            })
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            batch_size: 64,
            metric: SimilarityMetric::Cosine,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            mode: AgentMode::React,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 1024,
            max_iterations: 6,
        }
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            model: default_judge_model(),
            temperature: 0.0,
            max_tokens: default_judge_max_tokens(),
            strategy: JudgeStrategy::default(),
            parallel: default_parallel(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        self.chunking.validate()?;

        if self.provider.timeout_secs == 0 {
            return Err(DomainError::configuration("provider.timeout_secs must be > 0"));
        }

        if self.embedding.batch_size == 0 {
            return Err(DomainError::configuration("embedding.batch_size must be > 0"));
        }

        if self.retrieval.top_k == 0 {
            return Err(DomainError::configuration("retrieval.top_k must be > 0"));
        }

        if self.agent.max_iterations == 0 {
            return Err(DomainError::configuration("agent.max_iterations must be > 0"));
        }

        for (name, temperature) in [
            ("agent.temperature", self.agent.temperature),
            ("judge.temperature", self.judge.temperature),
        ] {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(DomainError::configuration(format!(
                    "{} must be between 0 and 2",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.agent.model, "gpt-4o-mini");
        assert_eq!(config.agent.temperature, 0.2);
        assert_eq!(config.judge.temperature, 0.0);
        assert_eq!(config.judge.strategy, JudgeStrategy::Independent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[agent]\nmax_iterations = 3\n\n[judge]\nstrategy = \"combined\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.agent.max_iterations, 3);
        assert_eq!(config.agent.model, "gpt-4o-mini");
        assert_eq!(config.judge.strategy, JudgeStrategy::Combined);
        assert!(config.judge.parallel);
        assert_eq!(config.chunking.chunk_size, 1000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.chunking.chunk_overlap = 1000;
        assert!(matches!(config.validate(), Err(DomainError::Validation { .. })));

        let mut config = AppConfig::default();
        config.retrieval.top_k = 0;
        assert!(matches!(config.validate(), Err(DomainError::Configuration { .. })));

        let mut config = AppConfig::default();
        config.agent.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.agent.max_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let provider = ProviderConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert_eq!(provider.resolved_api_key().unwrap(), "sk-test");
    }
}
