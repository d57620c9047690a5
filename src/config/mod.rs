//! Layered application configuration

mod app_config;

pub use app_config::{
    AgentConfig, AppConfig, EmbeddingConfig, JudgeConfig, JudgeStrategy, LogFormat,
    LoggingConfig, ProviderConfig, RetrievalConfig,
};
