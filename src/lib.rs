//! RAG Evaluator
//!
//! Answers questions about a single document with a retrieval-augmented agent
//! and scores every answer with an LLM judge:
//! - Document loading (text, Markdown, PDF) and overlap-aware chunking
//! - Exact vector index with cosine or Euclidean similarity
//! - ReAct agent with the retriever as its only tool
//! - Relevance, faithfulness and groundedness scoring

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod session;

pub use config::AppConfig;
pub use session::{IngestionSummary, Session};

use tracing::info;

/// Create a session from the loaded configuration, talking to the configured provider
pub fn create_session(config: AppConfig) -> anyhow::Result<Session> {
    let session = Session::from_config(config)?;
    info!(session = %session.id(), "Session ready");
    Ok(session)
}
