//! ReAct answering agent

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::prompts;
use super::{as_generation_error, REACT_STOP};
use crate::config::AgentConfig;
use crate::domain::agent::{
    AgentAction, AgentAnswer, AgentState, AnsweringAgent, ConversationMemory,
};
use crate::domain::llm::{LlmProvider, LlmRequest, Message, Usage};
use crate::domain::retrieval::ContextRetriever;
use crate::domain::DomainError;
use crate::infrastructure::timeout::bounded;

/// Agent that alternates reasoning steps and retrieval until it can answer.
///
/// The memory lock is held for a whole `answer` call, so concurrent questions
/// to one agent are served one at a time.
pub struct ReactAgent {
    provider: Arc<dyn LlmProvider>,
    retriever: Arc<dyn ContextRetriever>,
    config: AgentConfig,
    timeout: Duration,
    memory: Mutex<ConversationMemory>,
}

impl fmt::Debug for ReactAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactAgent")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.config.model)
            .field("max_iterations", &self.config.max_iterations)
            .finish_non_exhaustive()
    }
}

/// Per-call working state
struct Run<'a> {
    question: &'a str,
    history: Vec<Message>,
    scratchpad: Vec<Message>,
    answer: AgentAnswer,
}

impl ReactAgent {
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

    async fn complete(&self, run: &Run<'_>) -> Result<(String, Usage), DomainError> {
        let request = LlmRequest::builder()
            .system(prompts::react_system_prompt())
            .messages(run.history.iter().cloned())
            .user(prompts::question_prompt(run.question))
            .messages(run.scratchpad.iter().cloned())
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .stop(REACT_STOP.iter().map(|s| s.to_string()).collect())
            .build();

        let response = bounded(
            "agent step",
            self.timeout,
            self.provider.chat(&self.config.model, request),
        )
        .await
        .map_err(as_generation_error)?;

        Ok((
            response.content().to_string(),
            response.usage.unwrap_or_default(),
        ))
    }

    /// One transition of the loop
    async fn step(
        &self,
        state: AgentState,
        run: &mut Run<'_>,
        memory: &mut ConversationMemory,
    ) -> Result<AgentState, DomainError> {
        let next = match state {
            AgentState::Reasoning if run.answer.iterations >= self.config.max_iterations => {
                AgentState::IterationLimitReached
            }
            AgentState::Reasoning => {
                run.answer.iterations += 1;
                let (reply, usage) = self.complete(run).await?;
                run.answer.usage.add(&usage);

                match AgentAction::parse(&reply) {
                    AgentAction::Retrieve { query, .. } => {
                        run.scratchpad.push(Message::assistant(reply.trim()));
                        AgentState::Retrieving { query }
                    }
                    AgentAction::Finish { answer, .. } => AgentState::Answering { answer },
                    AgentAction::Malformed { reason } => {
                        debug!(reason = %reason, "Malformed agent reply");
                        run.scratchpad.push(Message::assistant(reply.trim()));
                        run.scratchpad.push(Message::user(prompts::format_correction(&reason)));
                        AgentState::Reasoning
                    }
                    AgentAction::Empty => {
                        debug!("Empty agent reply");
                        AgentState::Reasoning
                    }
                }
            }
            AgentState::Retrieving { query } => {
                let context = self.retriever.retrieve(&query).await?;
                run.scratchpad.push(Message::user(prompts::observation(&context)));
                run.answer.retrieval_queries.push(query);
                AgentState::Reasoning
            }
            AgentState::IterationLimitReached => {
                warn!(
                    max_iterations = self.config.max_iterations,
                    "Agent step budget spent, forcing an answer"
                );
                run.answer.max_iterations_reached = true;
                run.scratchpad.push(Message::user(prompts::FORCE_ANSWER_PROMPT));

                let (reply, usage) = self.complete(run).await?;
                run.answer.usage.add(&usage);

                match AgentAction::parse(&reply) {
                    AgentAction::Finish { answer, .. } => AgentState::Answering { answer },
                    _ => {
                        return Err(DomainError::generation(format!(
                            "no final answer after {} iterations",
                            run.answer.iterations
                        )));
                    }
                }
            }
            AgentState::Answering { answer } => {
                memory.record(run.question, answer.as_str());
                run.answer.text = answer;
                AgentState::Done
            }
            AgentState::Done => AgentState::Done,
        };

        Ok(next)
    }
}

#[async_trait]
impl AnsweringAgent for ReactAgent {
    #[instrument(skip(self, question), fields(model = %self.config.model))]
    async fn answer(&self, question: &str) -> Result<AgentAnswer, DomainError> {
        let mut memory = self.memory.lock().await;

        let mut run = Run {
            question,
            history: memory.messages().to_vec(),
            scratchpad: Vec::new(),
            answer: AgentAnswer::new(""),
        };

        let mut state = AgentState::Reasoning;
        while !state.is_terminal() {
            debug!(state = state.name(), iteration = run.answer.iterations, "Agent step");
            state = self.step(state, &mut run, &mut memory).await?;
        }

        let answer = run.answer;

        info!(
            iterations = answer.iterations,
            retrievals = answer.retrieval_queries.len(),
            forced = answer.max_iterations_reached,
            "Agent answered"
        );

        Ok(answer)
    }

    async fn memory(&self) -> ConversationMemory {
        self.memory.lock().await.clone()
    }

    fn name(&self) -> &'static str {
        "react"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{MessageRole, MockLlmProvider};
    use crate::domain::retrieval::MockContextRetriever;

    const CONTEXT: &str = "Agentic AI systems can plan and act autonomously.";

    fn config(max_iterations: usize) -> AgentConfig {
        AgentConfig {
            max_iterations,
            ..AgentConfig::default()
        }
    }

    fn retriever(times: usize) -> Arc<MockContextRetriever> {
        let mut retriever = MockContextRetriever::new();
        retriever
            .expect_retrieve()
            .times(times)
            .returning(|_| Ok(CONTEXT.to_string()));
        Arc::new(retriever)
    }

    fn agent(
        provider: MockLlmProvider,
        retriever: Arc<MockContextRetriever>,
        max_iterations: usize,
    ) -> (ReactAgent, Arc<MockLlmProvider>) {
        let provider = Arc::new(provider);
        let agent = ReactAgent::new(
            provider.clone(),
            retriever,
            config(max_iterations),
            Duration::from_secs(5),
        );
        (agent, provider)
    }

    fn retrieve_step(query: &str) -> String {
        format!(
            "Thought: I should look this up.\nAction: document_retriever\nAction Input: {}",
            query
        )
    }

    #[tokio::test]
    async fn test_retrieve_then_answer() {
        let provider = MockLlmProvider::new("mock").with_script([
            retrieve_step("agentic AI definition"),
            "Thought: I know the answer\nFinal Answer: Systems that plan and act autonomously.".to_string(),
        ]);
        let (agent, provider) = agent(provider, retriever(1), 6);

        let answer = agent.answer("What is agentic AI?").await.unwrap();

        assert_eq!(answer.text, "Systems that plan and act autonomously.");
        assert_eq!(answer.iterations, 2);
        assert_eq!(answer.retrieval_queries, vec!["agentic AI definition"]);
        assert!(!answer.max_iterations_reached);
        assert_eq!(answer.usage.total_tokens, 30);

        let second = &provider.requests()[1];
        let last = second.messages.last().unwrap();
        assert_eq!(last.role, MessageRole::User);
        assert_eq!(last.content_text(), format!("Observation: {}", CONTEXT));
        assert_eq!(second.stop, Some(vec!["\nObservation:".to_string()]));
    }

    #[tokio::test]
    async fn test_plain_reply_is_final_answer() {
        let provider = MockLlmProvider::new("mock").with_text("It plans and acts.");
        let (agent, _) = agent(provider, retriever(0), 6);

        let answer = agent.answer("What is agentic AI?").await.unwrap();

        assert_eq!(answer.text, "It plans and acts.");
        assert_eq!(answer.iterations, 1);
        assert!(answer.retrieval_queries.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_reply_gets_correction() {
        let provider = MockLlmProvider::new("mock").with_script([
            "Thought: hmm\nAction: web_search\nAction Input: agentic",
            "Final Answer: done",
        ]);
        let (agent, provider) = agent(provider, retriever(0), 6);

        let answer = agent.answer("q").await.unwrap();

        assert_eq!(answer.text, "done");
        assert_eq!(answer.iterations, 2);
        let correction = provider.requests()[1].last_user_content().unwrap().to_string();
        assert!(correction.contains("unknown tool"));
    }

    #[tokio::test]
    async fn test_iteration_limit_forces_answer() {
        let provider = MockLlmProvider::new("mock")
            .with_script([retrieve_step("a"), retrieve_step("b")])
            .with_rule("run out of steps", "Final Answer: best effort");
        let (agent, provider) = agent(provider, retriever(2), 2);

        let answer = agent.answer("q").await.unwrap();

        assert_eq!(answer.text, "best effort");
        assert!(answer.max_iterations_reached);
        assert_eq!(answer.iterations, 2);
        assert_eq!(answer.retrieval_queries, vec!["a", "b"]);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_forced_answer_without_final_answer_fails() {
        let provider = MockLlmProvider::new("mock").with_script(["", ""]);
        let (agent, _) = agent(provider, retriever(0), 1);

        let result = agent.answer("q").await;

        assert!(matches!(result, Err(DomainError::Generation { .. })));
        assert!(agent.memory().await.is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_is_generation_error() {
        let provider = MockLlmProvider::new("mock").with_error("rate limited");
        let (agent, _) = agent(provider, retriever(0), 6);

        let result = agent.answer("q").await;

        assert!(matches!(result, Err(DomainError::Generation { .. })));
    }

    #[tokio::test]
    async fn test_timeout_is_generation_error() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_text("Final Answer: late")
                .with_delay(Duration::from_millis(200)),
        );
        let agent = ReactAgent::new(provider, retriever(0), config(6), Duration::from_millis(20));

        let result = agent.answer("q").await;

        match result {
            Err(DomainError::Generation { message, .. }) => assert!(message.contains("Timeout")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_retrieval_error_propagates() {
        let mut failing = MockContextRetriever::new();
        failing
            .expect_retrieve()
            .returning(|_| Err(DomainError::embedding("index unavailable")));
        let provider = MockLlmProvider::new("mock").with_text(retrieve_step("x"));
        let (agent, _) = agent(provider, Arc::new(failing), 6);

        let result = agent.answer("q").await;

        assert!(matches!(result, Err(DomainError::Embedding { .. })));
    }

    #[tokio::test]
    async fn test_memory_carries_previous_turns() {
        let provider = MockLlmProvider::new("mock")
            .with_script(["Final Answer: first", "Final Answer: second"]);
        let (agent, provider) = agent(provider, retriever(0), 6);

        agent.answer("one?").await.unwrap();
        agent.answer("two?").await.unwrap();

        let memory = agent.memory().await;
        assert_eq!(memory.turns(), 2);

        let second = &provider.requests()[1];
        let contents: Vec<&str> = second.messages.iter().map(|m| m.content_text()).collect();
        assert_eq!(contents[1..4], ["one?", "first", "Question: two?"]);
    }
}
