//! Ask command - answer one question from an index

use crate::cli::output::{colors, format_duration_ms, preview};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::Answer;
use clap::Args;
use std::sync::Arc;

/// Arguments for the ask command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question to answer
    pub question: String,

    /// Index name (defaults to storage.default_index)
    #[arg(long, short = 'i')]
    pub index: Option<String>,

    /// Number of chunks to retrieve as context
    #[arg(short = 'k', long)]
    pub k: Option<usize>,

    /// Print the retrieved chunks after the answer
    #[arg(long)]
    pub show_context: bool,
}

/// Execute the ask command
pub async fn execute(
    args: AskArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let answer = services
        .ask(args.index.as_deref(), &args.question, args.k)
        .await?;

    match format {
        OutputFormat::Human => print_answer(&answer, args.show_context),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&answer)?),
    }

    Ok(())
}

/// Print an answer, optionally followed by its ranked context
pub(crate) fn print_answer(answer: &Answer, show_context: bool) {
    println!("{}", answer.answer.trim_end());

    if show_context {
        println!();
        println!(
            "{} from '{}' ({}):",
            colors::label("Context"),
            colors::index_name(&answer.index),
            colors::dim(&format_duration_ms(answer.duration_ms))
        );
        for (rank, chunk) in answer.context.iter().enumerate() {
            println!(
                "  {} {} {}",
                colors::rank(&format!("{}.", rank + 1)),
                colors::score(&format!("{:.3}", chunk.score)),
                preview(&chunk.text, 100)
            );
        }
    }
}
