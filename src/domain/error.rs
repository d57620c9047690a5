use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Document load error: {message}")]
    DocumentLoad { message: String },

    #[error("Embedding error: {message}")]
    Embedding { message: String, retryable: bool },

    #[error("Generation error: {message}")]
    Generation { message: String, retryable: bool },

    #[error("Provider error: {provider} - {message}")]
    Provider {
        provider: String,
        message: String,
        retryable: bool,
    },

    #[error("Timeout: {operation} exceeded {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn document_load(message: impl Into<String>) -> Self {
        Self::DocumentLoad {
            message: message.into(),
        }
    }

    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
            retryable: false,
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            retryable: false,
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            retryable: false,
        }
    }

    /// Provider answered with a non-success HTTP status; 429 and 5xx are transient
    pub fn provider_status(
        provider: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            retryable: status == 429 || status >= 500,
        }
    }

    /// Provider could not be reached at all
    pub fn provider_unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            retryable: true,
        }
    }

    /// Rewrap as an embedding error, keeping whether the cause was transient
    pub fn into_embedding(self) -> Self {
        match self {
            Self::Embedding { .. } => self,
            other => Self::Embedding {
                retryable: other.is_retryable(),
                message: other.to_string(),
            },
        }
    }

    /// Rewrap as a generation error, keeping whether the cause was transient
    pub fn into_generation(self) -> Self {
        match self {
            Self::Generation { .. } => self,
            other => Self::Generation {
                retryable: other.is_retryable(),
                message: other.to_string(),
            },
        }
    }

    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Transient failures that a caller may retry with backoff.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Provider { retryable, .. }
            | Self::Embedding { retryable, .. }
            | Self::Generation { retryable, .. } => *retryable,
            _ => false,
        }
    }
}
