//! Config command - show current configuration

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the show-config command
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Configuration response
///
/// The API key is reported only as present or absent.
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub data_dir: String,
    pub api_key_set: bool,
    #[serde(flatten)]
    pub config: Config,
}

/// Execute the show-config command
pub async fn execute(
    _args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = services.config.as_ref().clone();
    let xdg = XdgDirs::new();

    let response = ConfigResponse {
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        data_dir: xdg.data_dir.to_string_lossy().into_owned(),
        api_key_set: config.model.api_key.is_some(),
        config,
    };

    match format {
        OutputFormat::Human => {
            let c = &response.config;
            println!("{}:", colors::label("Configuration"));
            println!("  config_file: {}", colors::file_path(&response.config_file));
            println!("  data_dir: {}", colors::file_path(&response.data_dir));
            println!("  indexing:");
            println!("    chunk_size: {}", c.indexing.chunk_size);
            println!("    overlap: {}", c.indexing.overlap);
            println!("  storage:");
            println!("    index_dir: {}", c.storage.index_dir.display());
            println!("    default_index: {}", c.storage.default_index);
            println!("  search:");
            println!("    default_k: {}", c.search.default_k);
            println!("    max_k: {}", c.search.max_k);
            println!("    metric: {}", c.search.metric);
            println!("    max_question_length: {}", c.search.max_question_length);
            println!("  model:");
            println!("    base_url: {}", c.model.base_url);
            println!("    embedding_model: {}", c.model.embedding_model);
            println!("    chat_model: {}", c.model.chat_model);
            println!("    temperature: {}", c.model.temperature);
            println!("    embed_batch_size: {}", c.model.embed_batch_size);
            println!(
                "    api_key: {}",
                if response.api_key_set {
                    colors::success("set")
                } else {
                    colors::warning("not set")
                }
            );
            println!("  limits:");
            println!("    request_timeout_sec: {}", c.limits.request_timeout_sec);
            println!("    max_retries: {}", c.limits.max_retries);
            println!("    retry_base_delay_ms: {}", c.limits.retry_base_delay_ms);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
