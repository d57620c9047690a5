//! Judge prompt templates

use crate::domain::evaluation::{JudgeDimension, JudgeInputs};

pub const RELEVANCE_PROMPT: &str = "You are an evaluator.
Score the relevance of the answer to the question from 0 to 1.
ONLY return a number.
Question:
${question}
Answer:
${answer}";

pub const FAITHFULNESS_PROMPT: &str = "You are an evaluator.
Score how factually faithful the answer is to the context from 0 to 1.
ONLY return a number.
Context:
${context}
Answer:
${answer}";

pub const GROUNDEDNESS_PROMPT: &str = "You are an evaluator.
Score how well the answer is grounded in the given context from 0 to 1.
ONLY return a number.
Context:
${context}
Answer:
${answer}";

pub const COMBINED_CONTEXT_PROMPT: &str = r#"You are an evaluator.
Rate the answer against the context on two scales from 0 to 1.
faithfulness: the answer states nothing that contradicts the context.
groundedness: every claim in the answer can be traced back to the context.
ONLY return a JSON object like {"faithfulness": 0.0, "groundedness": 0.0}.
Context:
${context}
Answer:
${answer}"#;

/// Fill `${name}` slots in one left-to-right pass; inserted text is never rescanned
fn render(template: &str, inputs: &JudgeInputs) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        rendered.push_str(&rest[..start]);
        let tail = &rest[start..];

        let value = tail.find('}').and_then(|end| {
            let value = match &tail[2..end] {
                "question" => inputs.question.as_str(),
                "context" => inputs.context.as_str(),
                "answer" => inputs.answer.as_str(),
                _ => return None,
            };
            Some((value, end + 1))
        });

        match value {
            Some((value, consumed)) => {
                rendered.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                rendered.push_str("${");
                rest = &tail[2..];
            }
        }
    }

    rendered.push_str(rest);
    rendered
}

/// Single-dimension prompt
pub fn dimension_prompt(dimension: JudgeDimension, inputs: &JudgeInputs) -> String {
    let template = match dimension {
        JudgeDimension::Relevance => RELEVANCE_PROMPT,
        JudgeDimension::Faithfulness => FAITHFULNESS_PROMPT,
        JudgeDimension::Groundedness => GROUNDEDNESS_PROMPT,
    };
    render(template, inputs)
}

/// Faithfulness and groundedness in one structured request
pub fn combined_prompt(inputs: &JudgeInputs) -> String {
    render(COMBINED_CONTEXT_PROMPT, inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_prompt_omits_context() {
        let inputs = JudgeInputs::new("What is X?", "X is Y.", "SECRET CONTEXT");
        let prompt = dimension_prompt(JudgeDimension::Relevance, &inputs);

        assert!(prompt.contains("Question:\nWhat is X?\nAnswer:\nX is Y."));
        assert!(!prompt.contains("SECRET CONTEXT"));
    }

    #[test]
    fn test_context_prompts_omit_question() {
        let inputs = JudgeInputs::new("QUESTION TEXT", "X is Y.", "X is Y, says the doc.");

        for dimension in [JudgeDimension::Faithfulness, JudgeDimension::Groundedness] {
            let prompt = dimension_prompt(dimension, &inputs);
            assert!(prompt.contains("Context:\nX is Y, says the doc.\nAnswer:\nX is Y."));
            assert!(!prompt.contains("QUESTION TEXT"));
            assert!(!prompt.contains("${"));
        }
    }

    #[test]
    fn test_combined_prompt() {
        let prompt = combined_prompt(&JudgeInputs::new("q", "the answer", "the context"));
        assert!(prompt.contains("\"faithfulness\""));
        assert!(prompt.ends_with("Context:\nthe context\nAnswer:\nthe answer"));
    }

    #[test]
    fn test_placeholders_in_inputs_are_left_verbatim() {
        let inputs = JudgeInputs::new(
            "What does ${context} mean?",
            "FABRICATED CLAIM",
            "Shell docs: echo ${answer} prints the variable.",
        );

        for dimension in [JudgeDimension::Faithfulness, JudgeDimension::Groundedness] {
            let prompt = dimension_prompt(dimension, &inputs);
            assert!(prompt.contains(
                "Context:\nShell docs: echo ${answer} prints the variable.\nAnswer:\nFABRICATED CLAIM"
            ));
            assert_eq!(prompt.matches("FABRICATED CLAIM").count(), 1);
        }

        let relevance = dimension_prompt(JudgeDimension::Relevance, &inputs);
        assert!(relevance.contains("Question:\nWhat does ${context} mean?\nAnswer:"));
        assert!(!relevance.contains("Shell docs"));

        let combined = combined_prompt(&inputs);
        assert_eq!(combined.matches("FABRICATED CLAIM").count(), 1);
    }

    #[test]
    fn test_unknown_placeholder_is_kept() {
        let inputs = JudgeInputs::new("q", "a", "c");
        assert_eq!(render("${other} ${answer} ${", &inputs), "${other} a ${");
    }
}
