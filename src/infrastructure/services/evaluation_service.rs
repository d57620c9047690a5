//! Question-level evaluation: retrieve, answer, judge

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::domain::agent::AnsweringAgent;
use crate::domain::evaluation::{EvaluationReport, EvaluationRun, Judge, JudgeInputs};
use crate::domain::retrieval::ContextRetriever;
use crate::domain::DomainError;

/// Runs one question through an agent and scores the answer
#[derive(Debug, Clone)]
pub struct EvaluationService {
    judge: Arc<dyn Judge>,
}

impl EvaluationService {
    pub fn new(judge: Arc<dyn Judge>) -> Self {
        Self { judge }
    }

    /// Evaluate `question` and return the report only
    pub async fn evaluate(
        &self,
        question: &str,
        agent: &dyn AnsweringAgent,
        retriever: &dyn ContextRetriever,
    ) -> Result<EvaluationReport, DomainError> {
        Ok(self
            .evaluate_with_details(question, agent, retriever)
            .await?
            .report)
    }

    /// Evaluate `question`, keeping the retrieved context and the agent's trace.
    ///
    /// The judge sees the context retrieved for the question itself, not the
    /// queries the agent chose. Latency covers the agent call alone. Retrieval
    /// and agent errors abort the evaluation; judge problems only lower scores.
    #[instrument(skip(self, agent, retriever), fields(agent_name = agent.name()))]
    pub async fn evaluate_with_details(
        &self,
        question: &str,
        agent: &dyn AnsweringAgent,
        retriever: &dyn ContextRetriever,
    ) -> Result<EvaluationRun, DomainError> {
        let context = retriever.retrieve(question).await?;

        let started = Instant::now();
        let agent_answer = agent.answer(question).await?;
        let latency = started.elapsed();

        if agent_answer.max_iterations_reached {
            warn!(
                iterations = agent_answer.iterations,
                "Agent hit its iteration limit, answer was forced"
            );
        }

        let inputs = JudgeInputs::new(question, agent_answer.text.as_str(), context.as_str());
        let scores = self.judge.score_all(&inputs).await;

        let report = EvaluationReport::new(question, agent_answer.text.as_str(), scores, latency);

        info!(
            relevance = report.relevance,
            faithfulness = report.faithfulness,
            groundedness = report.groundedness,
            overall = report.overall_score,
            latency_sec = report.latency_sec,
            "Evaluation complete"
        );

        Ok(EvaluationRun {
            report,
            context,
            agent_answer,
        })
    }
}
