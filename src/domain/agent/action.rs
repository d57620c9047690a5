//! Parsing of ReAct-style model replies

use once_cell::sync::Lazy;
use regex::Regex;

/// Name the model must use to call the retriever
pub const RETRIEVER_TOOL: &str = "document_retriever";

static FINAL_ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)final\s*answer\s*:\s*(.*)$").unwrap());

static ACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*action\s*:\s*(.+?)\s*$").unwrap());

static ACTION_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)action\s*input\s*:\s*(.*?)\s*(?:\n\s*observation\s*:.*)?$").unwrap()
});

static THOUGHT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)thought\s*:\s*(.*?)\s*(?:\n\s*(?:action|final\s*answer)\s*:|$)").unwrap()
});

/// The model's decision for one reasoning step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentAction {
    Retrieve {
        thought: Option<String>,
        query: String,
    },
    Finish {
        thought: Option<String>,
        answer: String,
    },
    /// Reply used the protocol but broke it; `reason` is fed back to the model
    Malformed { reason: String },
    /// Blank completion
    Empty,
}

impl AgentAction {
    pub fn parse(reply: &str) -> Self {
        let reply = reply.trim();

        if reply.is_empty() {
            return Self::Empty;
        }

        let thought = THOUGHT
            .captures(reply)
            .map(|c| c[1].trim().to_string())
            .filter(|t| !t.is_empty());
        let final_answer = FINAL_ANSWER.captures(reply).map(|c| c[1].trim().to_string());
        let action = ACTION.captures(reply).map(|c| c[1].trim().to_string());

        match (final_answer, action) {
            (Some(_), Some(_)) => Self::Malformed {
                reason: "reply contains both an Action and a Final Answer".to_string(),
            },
            (Some(answer), None) if answer.is_empty() => Self::Malformed {
                reason: "Final Answer is empty".to_string(),
            },
            (Some(answer), None) => Self::Finish { thought, answer },
            (None, Some(tool)) => Self::parse_tool_call(reply, &tool, thought),
            (None, None) if thought.is_some() || starts_with_label(reply) => Self::Malformed {
                reason: "reply has neither an Action nor a Final Answer".to_string(),
            },
            (None, None) => Self::Finish {
                thought: None,
                answer: reply.to_string(),
            },
        }
    }

    fn parse_tool_call(reply: &str, tool: &str, thought: Option<String>) -> Self {
        let normalized = tool
            .trim_matches(|c| c == '`' || c == '"')
            .to_lowercase()
            .replace(' ', "_");

        if normalized != RETRIEVER_TOOL {
            return Self::Malformed {
                reason: format!("unknown tool '{}', the only tool is {}", tool, RETRIEVER_TOOL),
            };
        }

        let query = ACTION_INPUT
            .captures(reply)
            .map(|c| strip_quotes(&c[1]).to_string())
            .unwrap_or_default();

        if query.is_empty() {
            return Self::Malformed {
                reason: "Action Input is missing".to_string(),
            };
        }

        Self::Retrieve { thought, query }
    }
}

fn starts_with_label(reply: &str) -> bool {
    let lower = reply.to_lowercase();
    lower.starts_with("thought:") || lower.starts_with("action input:")
}

fn strip_quotes(text: &str) -> &str {
    text.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_retrieve() {
        let reply = "Thought: I should look this up.\nAction: document_retriever\nAction Input: \"agentic AI definition\"";

        assert_eq!(
            AgentAction::parse(reply),
            AgentAction::Retrieve {
                thought: Some("I should look this up.".to_string()),
                query: "agentic AI definition".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_retrieve_ignores_hallucinated_observation() {
        let reply = "Action: Document Retriever\nAction Input: planning\nObservation: made up";

        assert_eq!(
            AgentAction::parse(reply),
            AgentAction::Retrieve {
                thought: None,
                query: "planning".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_final_answer() {
        let reply = "Thought: I now know the final answer\nFinal Answer: Systems that plan and act.";

        assert_eq!(
            AgentAction::parse(reply),
            AgentAction::Finish {
                thought: Some("I now know the final answer".to_string()),
                answer: "Systems that plan and act.".to_string(),
            }
        );
    }

    #[test]
    fn test_multiline_final_answer_is_kept() {
        let reply = "Final Answer: line one\nline two";

        match AgentAction::parse(reply) {
            AgentAction::Finish { answer, .. } => assert_eq!(answer, "line one\nline two"),
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_plain_text_is_final_answer() {
        assert_eq!(
            AgentAction::parse("  Agentic AI plans and acts.  "),
            AgentAction::Finish {
                thought: None,
                answer: "Agentic AI plans and acts.".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_reply() {
        assert_eq!(AgentAction::parse("   \n "), AgentAction::Empty);
    }

    #[test]
    fn test_thought_without_directive_is_malformed() {
        assert!(matches!(
            AgentAction::parse("Thought: let me think about it"),
            AgentAction::Malformed { .. }
        ));
    }

    #[test]
    fn test_unknown_tool_is_malformed() {
        let reply = "Action: web_search\nAction Input: agentic";
        assert!(matches!(AgentAction::parse(reply), AgentAction::Malformed { .. }));
    }

    #[test]
    fn test_missing_action_input_is_malformed() {
        let reply = "Thought: search\nAction: document_retriever";
        assert!(matches!(AgentAction::parse(reply), AgentAction::Malformed { .. }));
    }

    #[test]
    fn test_action_and_final_answer_is_malformed() {
        let reply = "Action: document_retriever\nAction Input: x\nFinal Answer: y";
        assert!(matches!(AgentAction::parse(reply), AgentAction::Malformed { .. }));
    }

    #[test]
    fn test_empty_final_answer_is_malformed() {
        assert!(matches!(
            AgentAction::parse("Final Answer:   "),
            AgentAction::Malformed { .. }
        ));
    }
}
