//! Evaluate command - score answers to a list of questions about one document

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::domain::evaluation::{EvaluationReport, EvaluationRun};

/// Arguments for the evaluate command
#[derive(Args, Clone)]
pub struct EvaluateArgs {
    /// Document to index (.txt, .md or .pdf)
    #[arg(long)]
    pub document: PathBuf,

    /// Question to evaluate; repeat for several, asked in order
    #[arg(long = "question", required = true)]
    pub questions: Vec<String>,

    /// Include the retrieved context in the output
    #[arg(long)]
    pub show_context: bool,

    /// Print reports as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    #[serde(flatten)]
    report: &'a EvaluationReport,
    band: &'static str,
    iterations: usize,
    max_iterations_reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

impl<'a> ReportOutput<'a> {
    fn new(run: &'a EvaluationRun, show_context: bool) -> Self {
        Self {
            report: &run.report,
            band: run.report.band().as_str(),
            iterations: run.agent_answer.iterations,
            max_iterations_reached: run.agent_answer.max_iterations_reached,
            context: show_context.then_some(run.context.as_str()),
        }
    }
}

/// Run the evaluate command
pub async fn run(args: EvaluateArgs) -> anyhow::Result<()> {
    let config = super::prepare()?;
    let retry = config.retry.clone();

    let session = crate::create_session(config)?;
    let input = super::read_document(&args.document).await?;
    let summary = session.ingest(input).await?;

    info!("Indexed {} ({} chunks)", summary.source_id, summary.chunks);

    let mut runs = Vec::with_capacity(args.questions.len());

    for question in &args.questions {
        let run = retry
            .run("evaluate", || session.evaluate(question))
            .await?;

        if !args.json {
            print_human(&run, args.show_context);
        }

        runs.push(run);
    }

    if args.json {
        let outputs: Vec<ReportOutput<'_>> = runs
            .iter()
            .map(|run| ReportOutput::new(run, args.show_context))
            .collect();
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    }

    Ok(())
}

fn print_human(run: &EvaluationRun, show_context: bool) {
    let report = &run.report;

    println!("Question:     {}", report.question);
    println!("Answer:       {}", report.answer);
    println!("Relevance:    {:.3}", report.relevance);
    println!("Faithfulness: {:.3}", report.faithfulness);
    println!("Groundedness: {:.3}", report.groundedness);
    println!(
        "Overall:      {:.3} ({})",
        report.overall_score,
        report.band().as_str()
    );
    println!("Latency:      {:.3}s", report.latency_sec);

    if run.agent_answer.max_iterations_reached {
        println!("Note:         answer forced after the iteration limit");
    }

    if show_context {
        println!("Context:\n{}", run.context);
    }

    println!();
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::agent::AgentAnswer;
    use crate::domain::evaluation::JudgeScores;

    fn run() -> EvaluationRun {
        let scores = JudgeScores {
            relevance: 0.9,
            faithfulness: 0.8,
            groundedness: 0.7,
        };
        EvaluationRun {
            report: EvaluationReport::new("q", "a", scores, Duration::from_millis(1234)),
            context: "ctx".to_string(),
            agent_answer: AgentAnswer::new("a"),
        }
    }

    #[test]
    fn test_json_output_shape() {
        let run = run();
        let value = serde_json::to_value(ReportOutput::new(&run, false)).unwrap();

        assert_eq!(value["question"], "q");
        assert_eq!(value["overall_score"], 0.8);
        assert_eq!(value["latency_sec"], 1.234);
        assert_eq!(value["band"], "good");
        assert!(value.get("context").is_none());
    }

    #[test]
    fn test_json_output_with_context() {
        let run = run();
        let value = serde_json::to_value(ReportOutput::new(&run, true)).unwrap();

        assert_eq!(value["context"], "ctx");
    }
}
