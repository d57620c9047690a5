//! LLM-as-judge scoring contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Quality dimension scored by the judge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeDimension {
    /// Does the answer address the question
    Relevance,
    /// Is the answer factually consistent with the context
    Faithfulness,
    /// Is the answer supported by the context
    Groundedness,
}

impl JudgeDimension {
    pub const ALL: [JudgeDimension; 3] = [
        JudgeDimension::Relevance,
        JudgeDimension::Faithfulness,
        JudgeDimension::Groundedness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Faithfulness => "faithfulness",
            Self::Groundedness => "groundedness",
        }
    }
}

/// Everything a judge may look at for one evaluation
#[derive(Debug, Clone)]
pub struct JudgeInputs {
    pub question: String,
    pub answer: String,
    pub context: String,
}

impl JudgeInputs {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            context: context.into(),
        }
    }
}

/// Scores for all three dimensions, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JudgeScores {
    pub relevance: f64,
    pub faithfulness: f64,
    pub groundedness: f64,
}

impl JudgeScores {
    pub fn get(&self, dimension: JudgeDimension) -> f64 {
        match dimension {
            JudgeDimension::Relevance => self.relevance,
            JudgeDimension::Faithfulness => self.faithfulness,
            JudgeDimension::Groundedness => self.groundedness,
        }
    }

    pub fn mean(&self) -> f64 {
        (self.relevance + self.faithfulness + self.groundedness) / 3.0
    }
}

/// Why a judge reply could not be read as a score
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JudgeParseError {
    #[error("judge reply is empty")]
    Empty,

    #[error("judge reply is not a number: {raw:?}")]
    NotANumber { raw: String },

    #[error("judge reply is not finite: {raw:?}")]
    NotFinite { raw: String },
}

/// Read a judge reply as a score, clamped into [0, 1].
///
/// Surrounding quotes, backticks and a trailing period are ignored.
pub fn parse_score(raw: &str) -> Result<f64, JudgeParseError> {
    let cleaned = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim()
        .trim_end_matches('.')
        .trim();

    if cleaned.is_empty() {
        return Err(JudgeParseError::Empty);
    }

    let value: f64 = cleaned.parse().map_err(|_| JudgeParseError::NotANumber {
        raw: raw.to_string(),
    })?;

    if !value.is_finite() {
        return Err(JudgeParseError::NotFinite {
            raw: raw.to_string(),
        });
    }

    Ok(value.clamp(0.0, 1.0))
}

/// Scores answers on the three quality dimensions.
///
/// Scoring never fails: any problem reaching or reading the judge model
/// yields 0.0 for that dimension.
#[async_trait]
pub trait Judge: Send + Sync + Debug {
    async fn score(&self, dimension: JudgeDimension, inputs: &JudgeInputs) -> f64;

    /// All three dimensions, scored concurrently
    async fn score_all(&self, inputs: &JudgeInputs) -> JudgeScores {
        score_concurrently(self, inputs).await
    }
}

/// Score every dimension with one `score` call each, joined
pub async fn score_concurrently<J: Judge + ?Sized>(judge: &J, inputs: &JudgeInputs) -> JudgeScores {
    let (relevance, faithfulness, groundedness) = futures::future::join3(
        judge.score(JudgeDimension::Relevance, inputs),
        judge.score(JudgeDimension::Faithfulness, inputs),
        judge.score(JudgeDimension::Groundedness, inputs),
    )
    .await;

    JudgeScores {
        relevance,
        faithfulness,
        groundedness,
    }
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;

    use super::*;

    /// Judge returning fixed per-dimension scores
    #[derive(Debug, Default)]
    pub struct MockJudge {
        scores: HashMap<JudgeDimension, f64>,
    }

    impl MockJudge {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_score(mut self, dimension: JudgeDimension, score: f64) -> Self {
            self.scores.insert(dimension, score);
            self
        }
    }

    #[async_trait]
    impl Judge for MockJudge {
        async fn score(&self, dimension: JudgeDimension, _inputs: &JudgeInputs) -> f64 {
            self.scores.get(&dimension).copied().unwrap_or(0.0)
        }
    }
}
