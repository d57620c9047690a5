//! Chat command - answer questions read from stdin

use std::path::PathBuf;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

/// Arguments for the chat command
#[derive(Args, Clone)]
pub struct ChatArgs {
    /// Document to index (.txt, .md or .pdf)
    #[arg(long)]
    pub document: PathBuf,

    /// Score every answer as well
    #[arg(long)]
    pub evaluate: bool,
}

/// Run the chat command
pub async fn run(args: ChatArgs) -> anyhow::Result<()> {
    let config = super::prepare()?;
    let session = crate::create_session(config)?;

    let input = super::read_document(&args.document).await?;
    let summary = session.ingest(input).await?;
    info!("Indexed {} ({} chunks)", summary.source_id, summary.chunks);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        if args.evaluate {
            match session.evaluate(question).await {
                Ok(run) => {
                    let report = &run.report;
                    println!("{}", report.answer);
                    println!(
                        "[relevance {:.3} | faithfulness {:.3} | groundedness {:.3} | overall {:.3} {} | {:.3}s]",
                        report.relevance,
                        report.faithfulness,
                        report.groundedness,
                        report.overall_score,
                        report.band().as_str(),
                        report.latency_sec
                    );
                }
                Err(e) => error!("Evaluation failed: {}", e),
            }
        } else {
            match session.ask(question).await {
                Ok(answer) => println!("{}", answer.text),
                Err(e) => error!("Answer failed: {}", e),
            }
        }

        println!();
    }

    Ok(())
}
