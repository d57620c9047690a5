use serde::{Deserialize, Serialize};

use crate::domain::llm::{Message, MessageRole};

/// Append-only record of earlier question/answer turns for one agent.
///
/// Not truncated: long sessions grow the prompt without bound.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationMemory {
    messages: Vec<Message>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed turn
    pub fn record(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.messages.push(Message::user(question));
        self.messages.push(Message::assistant(answer));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Completed turns
    pub fn turns(&self) -> usize {
        self.messages.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render as a transcript, for prompts that take history as text
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| {
                let speaker = match m.role {
                    MessageRole::User => "Human",
                    MessageRole::Assistant => "AI",
                    MessageRole::System => "System",
                };
                format!("{}: {}", speaker, m.content_text())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_in_order() {
        let mut memory = ConversationMemory::new();
        assert!(memory.is_empty());

        memory.record("q1", "a1");
        memory.record("q2", "a2");

        assert_eq!(memory.turns(), 2);
        let contents: Vec<_> = memory.messages().iter().map(|m| m.content_text()).collect();
        assert_eq!(contents, vec!["q1", "a1", "q2", "a2"]);
        assert_eq!(memory.messages()[1].role, MessageRole::Assistant);
    }

    #[test]
    fn test_transcript() {
        let mut memory = ConversationMemory::new();
        memory.record("What is RAG?", "Retrieval augmented generation.");

        assert_eq!(
            memory.transcript(),
            "Human: What is RAG?\nAI: Retrieval augmented generation."
        );
    }
}
