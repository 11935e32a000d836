//! Process command - build a named index from PDF files

use crate::cli::output::{colors, format_duration_ms, print_warning};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::UploadedDocument;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// PDF files to process
    pub pdfs: Vec<PathBuf>,

    /// Index name (defaults to storage.default_index)
    #[arg(long, short = 'i')]
    pub index: Option<String>,

    /// Chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between chunks in characters
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Suppress the summary line
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Execute the process command
pub async fn execute(
    args: ProcessArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut documents = Vec::with_capacity(args.pdfs.len());
    for path in &args.pdfs {
        let document = UploadedDocument::from_path(path)
            .map_err(|e| format!("Failed to read '{}': {e}", path.display()))?;
        documents.push(document);
    }

    if format == OutputFormat::Human && !args.quiet && !documents.is_empty() {
        eprintln!(
            "Processing {} document(s) into '{}'...",
            colors::number(&documents.len().to_string()),
            colors::index_name(services.index_name(args.index.as_deref()))
        );
    }

    let stats = services
        .process(
            args.index.as_deref(),
            &documents,
            args.chunk_size,
            args.overlap,
        )
        .await?;

    match format {
        OutputFormat::Human => {
            if stats.documents_skipped > 0 {
                print_warning(&format!(
                    "{} document(s) could not be opened and were skipped",
                    stats.documents_skipped
                ));
            }
            if stats.pages_skipped > 0 {
                print_warning(&format!(
                    "{} page(s) had no extractable text and were skipped",
                    stats.pages_skipped
                ));
            }
            if !args.quiet {
                println!(
                    "{} {} pages ({} chunks, dim {}) into '{}' in {}",
                    colors::success("Indexed"),
                    colors::number(&(stats.pages - stats.pages_skipped).to_string()),
                    colors::number(&stats.chunks_created.to_string()),
                    colors::number(&stats.dimension.to_string()),
                    colors::index_name(&stats.index),
                    format_duration_ms(stats.duration_ms)
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
