//! Single-retrieval baseline agent

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::as_generation_error;
use super::prompts;
use crate::config::AgentConfig;
use crate::domain::agent::{AgentAnswer, AnsweringAgent, ConversationMemory};
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::retrieval::ContextRetriever;
use crate::domain::DomainError;
use crate::infrastructure::timeout::bounded;

/// Retrieves once for the question and answers from that context alone
pub struct DirectAgent {
    provider: Arc<dyn LlmProvider>,
    retriever: Arc<dyn ContextRetriever>,
    config: AgentConfig,
    timeout: Duration,
    memory: Mutex<ConversationMemory>,
}

impl fmt::Debug for DirectAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectAgent")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl DirectAgent {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        retriever: Arc<dyn ContextRetriever>,
        config: AgentConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            retriever,
            config,
            timeout,
            memory: Mutex::new(ConversationMemory::new()),
        }
    }
}

#[async_trait]
impl AnsweringAgent for DirectAgent {
    #[instrument(skip(self, question), fields(model = %self.config.model))]
    async fn answer(&self, question: &str) -> Result<AgentAnswer, DomainError> {
        let mut memory = self.memory.lock().await;

        let context = self.retriever.retrieve(question).await?;

        let request = LlmRequest::builder()
            .system(prompts::DIRECT_SYSTEM_PROMPT)
            .messages(memory.messages().iter().cloned())
            .user(prompts::direct_prompt(question, &context))
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build();

        let response = bounded(
            "agent answer",
            self.timeout,
            self.provider.chat(&self.config.model, request),
        )
        .await
        .map_err(as_generation_error)?;

        let text = response.content().trim().to_string();
        if text.is_empty() {
            return Err(DomainError::generation("model returned an empty answer"));
        }

        memory.record(question, text.as_str());
        debug!(context_len = context.len(), "Direct answer produced");

        Ok(AgentAnswer {
            text,
            iterations: 1,
            retrieval_queries: vec![question.to_string()],
            max_iterations_reached: false,
            usage: response.usage.unwrap_or_default(),
        })
    }

    async fn memory(&self) -> ConversationMemory {
        self.memory.lock().await.clone()
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}
