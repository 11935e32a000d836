//! Index commands - list, info, delete, verify
//!
//! Exposed as top-level CLI commands:
//! - `list-indexes`
//! - `index-info`
//! - `delete-index`
//! - `verify-index`

use crate::cli::output::{colors, format_bytes, format_relative_time};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::storage::{IndexValidator, ValidationReport};
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

/// Arguments for index list
#[derive(Args, Debug)]
pub struct ListArgs {}

/// Arguments for index info
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Index name (defaults to storage.default_index)
    pub index: Option<String>,
}

/// Arguments for index delete
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Index name
    pub index: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Arguments for index verification
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Index name (defaults to storage.default_index)
    pub index: Option<String>,

    /// Verify every index
    #[arg(long, conflicts_with = "index")]
    pub all: bool,
}

/// Index list item
#[derive(Debug, Serialize)]
pub struct IndexListItem {
    pub name: String,
    pub documents: usize,
    pub chunks: usize,
    pub dimension: usize,
    pub size_bytes: u64,
    pub created_at: String,
}

/// Index list response
#[derive(Debug, Serialize)]
pub struct IndexListResponse {
    pub count: usize,
    pub indexes: Vec<IndexListItem>,
}

/// Verification response
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub consistent: bool,
    pub reports: Vec<ValidationReport>,
}

/// Execute list-indexes command
pub async fn execute_list(
    _args: ListArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let indexes = services.store.list()?;

    match format {
        OutputFormat::Human => {
            if indexes.is_empty() {
                println!(
                    "No indexes found. Run '{}' to create one.",
                    colors::label("docqa process <file.pdf>...")
                );
                return Ok(());
            }

            println!(
                "{} ({}):",
                colors::label("Indexes"),
                colors::number(&indexes.len().to_string())
            );
            for meta in &indexes {
                println!(
                    "  {:<20} {:>4} docs  {:>6} chunks  {:>10}  {}",
                    colors::index_name(&meta.name),
                    colors::number(&meta.documents.to_string()),
                    colors::number(&meta.chunks.to_string()),
                    colors::number(&format_bytes(meta.index_size_bytes)),
                    colors::dim(&format_relative_time(&meta.created_at))
                );
            }
        }
        OutputFormat::Json => {
            let response = IndexListResponse {
                count: indexes.len(),
                indexes: indexes
                    .iter()
                    .map(|m| IndexListItem {
                        name: m.name.clone(),
                        documents: m.documents,
                        chunks: m.chunks,
                        dimension: m.dimension,
                        size_bytes: m.index_size_bytes,
                        created_at: m.created_at.to_rfc3339(),
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Execute index-info command
pub async fn execute_info(
    args: InfoArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = services.index_name(args.index.as_deref());
    let metadata = services.store.get_metadata(name).map_err(|e| {
        if e.is_not_found() {
            format!("Index '{name}' not found. Run 'docqa list-indexes' to see available indexes.")
        } else {
            e.to_string()
        }
    })?;

    match format {
        OutputFormat::Human => {
            println!(
                "{}: {}",
                colors::label("Index"),
                colors::index_name(&metadata.name)
            );
            println!(
                "  {}: {}",
                colors::label("Location"),
                colors::file_path(&services.store.index_path(name).display().to_string())
            );
            println!(
                "  {}: {} ({} pages, {} skipped)",
                colors::label("Documents"),
                colors::number(&metadata.documents.to_string()),
                colors::number(&metadata.pages.to_string()),
                colors::number(&metadata.pages_skipped.to_string())
            );
            println!(
                "  {}: {}",
                colors::label("Chunks"),
                colors::number(&metadata.chunks.to_string())
            );
            println!(
                "  {}: {} ({})",
                colors::label("Vectors"),
                colors::number(&metadata.dimension.to_string()),
                metadata.metric
            );
            println!(
                "  {}: {}",
                colors::label("Model"),
                metadata.embedding_model
            );
            println!(
                "  {}: {}",
                colors::label("Size"),
                colors::number(&format_bytes(metadata.index_size_bytes))
            );
            println!(
                "  {}: {}",
                colors::label("Disk usage"),
                colors::number(&format_bytes(services.store.disk_usage(name)))
            );
            println!(
                "  {}: {}",
                colors::label("Created"),
                colors::dim(&metadata.created_at.to_rfc3339())
            );
            println!("  {}:", colors::label("Chunking"));
            println!(
                "    chunk_size: {}",
                colors::number(&metadata.chunk_size.to_string())
            );
            println!(
                "    overlap: {}",
                colors::number(&metadata.overlap.to_string())
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
    }

    Ok(())
}

/// Execute delete-index command
pub async fn execute_delete(
    args: DeleteArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !services.store.exists(&args.index) {
        return Err(format!(
            "Index '{}' not found. Run 'docqa list-indexes' to see available indexes.",
            args.index
        )
        .into());
    }

    // Confirmation prompt unless --force
    if !args.force {
        print!(
            "Delete index '{}'? [y/N] ",
            colors::index_name(&args.index)
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", colors::dim("Cancelled."));
            return Ok(());
        }
    }

    services.store.delete(&args.index)?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} index '{}'",
                colors::success("Deleted"),
                colors::index_name(&args.index)
            );
        }
        OutputFormat::Json => {
            let response = serde_json::json!({
                "deleted": true,
                "index": args.index
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Execute verify-index command
///
/// Fails when any verified index is inconsistent.
pub async fn execute_verify(
    args: VerifyArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let validator = IndexValidator::new(&services.store);

    let reports = if args.all {
        validator.validate_all()?
    } else {
        vec![validator.validate(services.index_name(args.index.as_deref()))?]
    };

    let response = VerifyResponse {
        consistent: reports.iter().all(|r| r.is_consistent),
        reports,
    };

    match format {
        OutputFormat::Human => {
            if response.reports.is_empty() {
                println!("No indexes to verify.");
            }
            for report in &response.reports {
                if report.is_consistent {
                    println!(
                        "{} {} ({} chunks, dim {})",
                        colors::success("OK"),
                        colors::index_name(&report.index),
                        colors::number(&report.actual_entries.to_string()),
                        colors::number(&report.actual_dimension.to_string())
                    );
                } else {
                    println!(
                        "{} {}",
                        colors::error("FAILED"),
                        colors::index_name(&report.index)
                    );
                    match &report.error {
                        Some(error) => println!("  {}", error),
                        None => println!(
                            "  metadata says {} chunks (dim {}), file has {} (dim {})",
                            report.metadata_chunks,
                            report.metadata_dimension,
                            report.actual_entries,
                            report.actual_dimension
                        ),
                    }
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    if !response.consistent {
        return Err("Index verification failed. Process the documents again to rebuild it.".into());
    }

    Ok(())
}
