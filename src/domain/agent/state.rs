/// States of the answering loop.
///
/// ```text
/// Reasoning --Retrieve--> Retrieving --observation--> Reasoning
/// Reasoning --Finish----> Answering --memory--------> Done
/// Reasoning --budget----> IterationLimitReached --forced answer--> Answering
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentState {
    /// Ask the model for the next step
    Reasoning,
    /// Run the retriever with the model's query
    Retrieving { query: String },
    /// A final answer is known and must be recorded
    Answering { answer: String },
    /// Step budget spent without a final answer
    IterationLimitReached,
    Done,
}

impl AgentState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reasoning => "reasoning",
            Self::Retrieving { .. } => "retrieving",
            Self::Answering { .. } => "answering",
            Self::IterationLimitReached => "iteration_limit_reached",
            Self::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}
