use serde::{Deserialize, Serialize};

use crate::domain::llm::Usage;

/// Outcome of one `answer` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAnswer {
    pub text: String,
    /// Model calls made in the reasoning loop
    pub iterations: usize,
    /// Queries sent to the retriever, in order
    pub retrieval_queries: Vec<String>,
    /// The answer was forced after the step budget ran out
    pub max_iterations_reached: bool,
    pub usage: Usage,
}

impl AgentAnswer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            iterations: 0,
            retrieval_queries: Vec::new(),
            max_iterations_reached: false,
            usage: Usage::default(),
        }
    }
}
