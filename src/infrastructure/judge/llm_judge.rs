//! Judge backed by a chat model

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::prompts::{combined_prompt, dimension_prompt};
use crate::config::{JudgeConfig, JudgeStrategy};
use crate::domain::evaluation::{
    parse_score, score_concurrently, Judge, JudgeDimension, JudgeInputs, JudgeParseError,
    JudgeScores,
};
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::DomainError;
use crate::infrastructure::timeout::bounded;

/// Scores answers by prompting a judge model.
///
/// Every failure path (provider error, timeout, unreadable reply) logs a
/// warning and scores 0.0.
#[derive(Debug)]
pub struct LlmJudge {
    provider: Arc<dyn LlmProvider>,
    config: JudgeConfig,
    timeout: Duration,
}

impl LlmJudge {
    pub fn new(provider: Arc<dyn LlmProvider>, config: JudgeConfig, timeout: Duration) -> Self {
        Self {
            provider,
            config,
            timeout,
        }
    }

    async fn complete(&self, prompt: String) -> Result<String, DomainError> {
        let request = LlmRequest::builder()
            .user(prompt)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build();

        let response = bounded(
            "judge",
            self.timeout,
            self.provider.chat(&self.config.model, request),
        )
        .await?;

        Ok(response.content().to_string())
    }

    /// Faithfulness and groundedness from one JSON reply
    async fn score_context_combined(&self, inputs: &JudgeInputs) -> (f64, f64) {
        let reply = match self.complete(combined_prompt(inputs)).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Combined judge call failed, scoring 0.0");
                return (0.0, 0.0);
            }
        };

        let parsed = extract_json(&reply).and_then(|json| serde_json::from_str::<Value>(json).ok());

        let Some(object) = parsed else {
            warn!(reply = %reply, "Combined judge reply is not JSON, scoring 0.0");
            return (0.0, 0.0);
        };

        (
            json_score(&object, JudgeDimension::Faithfulness),
            json_score(&object, JudgeDimension::Groundedness),
        )
    }
}

/// First `{` to last `}`, so fenced or chatty replies still parse
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    (start < end).then(|| &text[start..=end])
}

fn json_score(object: &Value, dimension: JudgeDimension) -> f64 {
    let result = match object.get(dimension.as_str()) {
        None | Some(Value::Null) => Err(JudgeParseError::Empty),
        Some(Value::String(s)) => parse_score(s),
        Some(other) => parse_score(&other.to_string()),
    };

    result.unwrap_or_else(|e| {
        warn!(dimension = dimension.as_str(), error = %e, "Judge field unreadable, scoring 0.0");
        0.0
    })
}

#[async_trait]
impl Judge for LlmJudge {
    async fn score(&self, dimension: JudgeDimension, inputs: &JudgeInputs) -> f64 {
        let reply = match self.complete(dimension_prompt(dimension, inputs)).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(dimension = dimension.as_str(), error = %e, "Judge call failed, scoring 0.0");
                return 0.0;
            }
        };

        match parse_score(&reply) {
            Ok(score) => {
                debug!(dimension = dimension.as_str(), score, "Judge scored");
                score
            }
            Err(e) => {
                warn!(
                    dimension = dimension.as_str(),
                    error = %e,
                    "Judge reply unreadable, scoring 0.0"
                );
                0.0
            }
        }
    }

    async fn score_all(&self, inputs: &JudgeInputs) -> JudgeScores {
        match (self.config.strategy, self.config.parallel) {
            (JudgeStrategy::Independent, true) => score_concurrently(self, inputs).await,
            (JudgeStrategy::Independent, false) => JudgeScores {
                relevance: self.score(JudgeDimension::Relevance, inputs).await,
                faithfulness: self.score(JudgeDimension::Faithfulness, inputs).await,
                groundedness: self.score(JudgeDimension::Groundedness, inputs).await,
            },
            (JudgeStrategy::Combined, true) => {
                let (relevance, (faithfulness, groundedness)) = futures::future::join(
                    self.score(JudgeDimension::Relevance, inputs),
                    self.score_context_combined(inputs),
                )
                .await;

                JudgeScores {
                    relevance,
                    faithfulness,
                    groundedness,
                }
            }
            (JudgeStrategy::Combined, false) => {
                let relevance = self.score(JudgeDimension::Relevance, inputs).await;
                let (faithfulness, groundedness) = self.score_context_combined(inputs).await;

                JudgeScores {
                    relevance,
                    faithfulness,
                    groundedness,
                }
            }
        }
    }
}
