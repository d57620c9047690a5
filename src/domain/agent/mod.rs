//! Answering agent domain: loop states, reply parsing, and conversation memory

mod action;
mod answer;
mod memory;
mod state;

pub use action::{AgentAction, RETRIEVER_TOOL};
pub use answer::AgentAnswer;
pub use memory::ConversationMemory;
pub use state::AgentState;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// How the session answers questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    /// Multi-step reason/retrieve loop
    #[default]
    React,
    /// Single retrieval followed by one grounded completion
    Direct,
}

/// Produces answers to questions about the session's document
#[async_trait]
pub trait AnsweringAgent: Send + Sync + Debug {
    async fn answer(&self, question: &str) -> Result<AgentAnswer, DomainError>;

    /// Snapshot of the conversation so far
    async fn memory(&self) -> ConversationMemory;

    fn name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    /// Agent returning a fixed answer, or an error
    #[derive(Debug)]
    pub struct MockAnsweringAgent {
        answer: Option<AgentAnswer>,
        error: Option<String>,
        delay: Option<Duration>,
        questions: Mutex<Vec<String>>,
    }

    impl MockAnsweringAgent {
        pub fn new(text: impl Into<String>) -> Self {
            Self {
                answer: Some(AgentAnswer::new(text)),
                error: None,
                delay: None,
                questions: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(error: impl Into<String>) -> Self {
            Self {
                answer: None,
                error: Some(error.into()),
                delay: None,
                questions: Mutex::new(Vec::new()),
            }
        }

        pub fn with_answer(mut self, answer: AgentAnswer) -> Self {
            self.answer = Some(answer);
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn questions(&self) -> Vec<String> {
            self.questions.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AnsweringAgent for MockAnsweringAgent {
        async fn answer(&self, question: &str) -> Result<AgentAnswer, DomainError> {
            self.questions.lock().unwrap().push(question.to_string());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(ref error) = self.error {
                return Err(DomainError::generation(error));
            }

            self.answer
                .clone()
                .ok_or_else(|| DomainError::generation("No mock answer configured"))
        }

        async fn memory(&self) -> ConversationMemory {
            ConversationMemory::new()
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }
}
