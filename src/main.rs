use clap::Parser;
use rag_evaluator::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Evaluate(args) => cli::evaluate::run(args).await,
        Command::Chat(args) => cli::chat::run(args).await,
    }
}
