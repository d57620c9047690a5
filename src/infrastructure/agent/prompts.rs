//! Agent prompt templates

use crate::domain::agent::RETRIEVER_TOOL;

pub const REACT_SYSTEM_PROMPT: &str = "You answer questions about a single document.
You have one tool:

${tool}: Retrieve relevant document chunks for a query. Its input is a short search query.

Use this format:

Thought: what you need to find out next
Action: ${tool}
Action Input: the search query

You will then receive:

Observation: the retrieved chunks

Repeat Thought/Action/Action Input as needed. When you can answer, reply with:

Thought: I know the answer
Final Answer: the answer to the question

Never write an Action and a Final Answer in the same reply. Base your answer on the observations.";

pub const FORMAT_REMINDER: &str =
    "Reply with either an Action and Action Input, or a Final Answer.";

pub const FORCE_ANSWER_PROMPT: &str =
    "You have run out of steps. Using only what you have observed so far, \
reply now with your best answer in the form:
Final Answer: <answer>";

pub const EMPTY_OBSERVATION: &str = "No relevant passages were found.";

pub const DIRECT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. \
Answer strictly using the provided context. \
If the answer is not in the context, say 'I don't know'.";

/// System prompt with the retriever tool name filled in
pub fn react_system_prompt() -> String {
    REACT_SYSTEM_PROMPT.replace("${tool}", RETRIEVER_TOOL)
}

pub fn question_prompt(question: &str) -> String {
    format!("Question: {}", question)
}

pub fn observation(text: &str) -> String {
    if text.trim().is_empty() {
        format!("Observation: {}", EMPTY_OBSERVATION)
    } else {
        format!("Observation: {}", text)
    }
}

pub fn format_correction(reason: &str) -> String {
    format!("Observation: Invalid format, {}. {}", reason, FORMAT_REMINDER)
}

pub fn direct_prompt(question: &str, context: &str) -> String {
    format!("Context:\n{}\n\nQuestion:\n{}", context, question)
}
