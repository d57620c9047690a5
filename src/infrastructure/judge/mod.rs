//! LLM-as-judge implementation

mod llm_judge;
mod prompts;

pub use llm_judge::LlmJudge;
