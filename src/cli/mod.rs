//! CLI adapter for docqa
//!
//! Provides the command-line interface over the core pipeline:
//! processing PDFs into named indexes, asking questions, interactive
//! chat, and index maintenance.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      cli/        |
//!              | (clap adapter)   |
//!              +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// docqa - Question answering over PDF documents
///
/// Process PDFs into a persisted vector index, then ask questions
/// that are answered from the most similar passages.
#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(author = "RHOBIMD HEALTH")]
#[command(version)]
#[command(about = "Retrieval-augmented question answering over PDFs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, env = "DOCQA_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract, chunk and embed PDFs into a named index
    Process(commands::ProcessArgs),

    /// Ask a question against an index
    Ask(commands::AskArgs),

    /// Start an interactive question session
    Chat(commands::ChatArgs),

    /// List all indexes
    #[command(name = "list-indexes")]
    ListIndexes(commands::index::ListArgs),

    /// Show index details
    #[command(name = "index-info")]
    IndexInfo(commands::index::InfoArgs),

    /// Delete an index
    #[command(name = "delete-index")]
    DeleteIndex(commands::index::DeleteArgs),

    /// Check index integrity against its metadata
    #[command(name = "verify-index")]
    VerifyIndex(commands::index::VerifyArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  docqa completions bash > ~/.local/share/bash-completion/completions/docqa
    ///   zsh:   docqa completions zsh > ~/.zfunc/_docqa
    ///   fish:  docqa completions fish > ~/.config/fish/completions/docqa.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    // Initialize XDG directories
    let xdg = XdgDirs::new();
    xdg.log_paths();
    xdg.ensure_dirs_exist()?;

    // Load configuration
    let config = Config::load()?;
    config.log_config();

    // Create services
    let services = Arc::new(Services::from_config(config)?);

    // Execute command
    match cli.command {
        Commands::Process(args) => commands::process::execute(args, &services, cli.format).await,
        Commands::Ask(args) => commands::ask::execute(args, &services, cli.format).await,
        Commands::Chat(args) => commands::chat::execute(args, &services, cli.format).await,
        Commands::ListIndexes(args) => {
            commands::index::execute_list(args, &services, cli.format).await
        }
        Commands::IndexInfo(args) => {
            commands::index::execute_info(args, &services, cli.format).await
        }
        Commands::DeleteIndex(args) => {
            commands::index::execute_delete(args, &services, cli.format).await
        }
        Commands::VerifyIndex(args) => {
            commands::index::execute_verify(args, &services, cli.format).await
        }
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format).await,
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
