use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::JudgeScores;
use crate::domain::agent::AgentAnswer;

/// Round to three decimal places
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Per-question evaluation result; field names are part of the output format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub question: String,
    pub answer: String,
    pub relevance: f64,
    pub faithfulness: f64,
    pub groundedness: f64,
    pub latency_sec: f64,
    pub overall_score: f64,
}

impl EvaluationReport {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        scores: JudgeScores,
        latency: Duration,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            relevance: scores.relevance,
            faithfulness: scores.faithfulness,
            groundedness: scores.groundedness,
            latency_sec: round3(latency.as_secs_f64()),
            overall_score: round3(scores.mean()),
        }
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.overall_score)
    }
}

/// Coarse reading of an overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.75 {
            Self::Good
        } else if score <= 0.4 {
            Self::Poor
        } else {
            Self::Fair
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

/// A report plus what produced it
#[derive(Debug, Clone)]
pub struct EvaluationRun {
    pub report: EvaluationReport,
    pub context: String,
    pub agent_answer: AgentAnswer,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(r: f64, f: f64, g: f64) -> JudgeScores {
        JudgeScores {
            relevance: r,
            faithfulness: f,
            groundedness: g,
        }
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.123456), 0.123);
        assert_eq!(round3(0.8000000000000002), 0.8);
    }

    #[test]
    fn test_overall_is_rounded_mean() {
        let report = EvaluationReport::new("q", "a", scores(0.9, 0.8, 0.7), Duration::ZERO);
        assert_eq!(report.overall_score, 0.8);

        let report = EvaluationReport::new("q", "a", scores(1.0, 0.0, 0.0), Duration::ZERO);
        assert_eq!(report.overall_score, 0.333);
    }

    #[test]
    fn test_latency_is_rounded() {
        let report = EvaluationReport::new(
            "q",
            "a",
            scores(0.0, 0.0, 0.0),
            Duration::from_micros(1_234_567),
        );
        assert_eq!(report.latency_sec, 1.235);
    }

    #[test]
    fn test_serialized_field_names() {
        let report = EvaluationReport::new("q", "a", scores(0.5, 0.5, 0.5), Duration::ZERO);
        let json = serde_json::to_value(&report).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();

        assert_eq!(
            keys,
            vec![
                "answer",
                "faithfulness",
                "groundedness",
                "latency_sec",
                "overall_score",
                "question",
                "relevance",
            ]
        );
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(0.75), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(0.6), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(0.4), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(0.0), ScoreBand::Poor);
    }
}
