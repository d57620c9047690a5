//! CLI module for the RAG evaluator
//!
//! Provides subcommands:
//! - `evaluate`: answer and score a fixed list of questions
//! - `chat`: answer questions read from stdin

pub mod chat;
pub mod evaluate;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::ingestion::DocumentInput;
use crate::infrastructure::logging;

/// RAG Evaluator - answer questions about a document and score the answers
#[derive(Parser)]
#[command(name = "rag-evaluator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate answers to the given questions
    Evaluate(evaluate::EvaluateArgs),

    /// Interactive question answering over stdin
    Chat(chat::ChatArgs),
}

/// Load `.env` and layered configuration, then start logging
fn prepare() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

async fn read_document(path: &Path) -> anyhow::Result<DocumentInput> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(DocumentInput::new(bytes, filename))
}
