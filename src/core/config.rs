//! Configuration management for the docqa pipeline.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with defaults for every setting.

use crate::core::error::{DocQaError, Result};
use crate::core::storage::Metric;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character overlap between consecutive chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory for persisted indexes
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Index used when a command names none
    #[serde(default = "default_index_name")]
    pub default_index: String,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Default number of chunks retrieved per question
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Maximum chunks retrieved per question
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Similarity metric stored with newly built indexes
    #[serde(default)]
    pub metric: Metric,

    /// Maximum question length in characters
    #[serde(default = "default_max_question_length")]
    pub max_question_length: usize,
}

/// Embedding and generation model configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Generative Language API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Sampling temperature for answer synthesis
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Texts sent per batch embedding request
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,

    /// API key (prefer GOOGLE_API_KEY over storing it in the file)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

/// Limits configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Per-call timeout for external requests in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_sec: u64,

    /// Retries after a transient service failure
    #[serde(default)]
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,
}

// Default value functions
fn default_chunk_size() -> usize {
    10_000
}

fn default_overlap() -> usize {
    1_000
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("./data/indexes")
}

fn default_index_name() -> String {
    "faiss_index".to_string()
}

fn default_k() -> usize {
    4
}

fn default_max_k() -> usize {
    50
}

fn default_max_question_length() -> usize {
    2000
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_embedding_model() -> String {
    "models/embedding-001".to_string()
}

fn default_chat_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_embed_batch_size() -> usize {
    100
}

fn default_request_timeout() -> u64 {
    60
}

fn default_retry_base_delay() -> u64 {
    500
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
            default_index: default_index_name(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            max_k: default_max_k(),
            metric: Metric::default(),
            max_question_length: default_max_question_length(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            embedding_model: default_embedding_model(),
            chat_model: default_chat_model(),
            temperature: default_temperature(),
            embed_batch_size: default_embed_batch_size(),
            api_key: None,
        }
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("base_url", &self.base_url)
            .field("embedding_model", &self.embedding_model)
            .field("chat_model", &self.chat_model)
            .field("temperature", &self.temperature)
            .field("embed_batch_size", &self.embed_batch_size)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_sec: default_request_timeout(),
            max_retries: 0,
            retry_base_delay_ms: default_retry_base_delay(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DocQaError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// This method uses XDG Base Directory specification for file locations.
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. DOCQA_CONFIG env var
    /// 2. XDG config file (~/.config/docqa/config.toml, or DOCQA_CONFIG_FILE)
    /// 3. ./docqa.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("DOCQA_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("docqa.toml").exists() {
                Self::from_file("docqa.toml")?
            } else {
                Self::default()
            }
        };

        // Place indexes under the XDG data directory unless set explicitly
        if env::var("DOCQA_DATA_DIR").is_err() && config.storage.index_dir == default_index_dir()
        {
            config.storage.index_dir = xdg.indexes_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Indexing configuration
        if let Some(size) = parse_env("DOCQA_CHUNK_SIZE") {
            self.indexing.chunk_size = size;
        }
        if let Some(o) = parse_env("DOCQA_OVERLAP") {
            self.indexing.overlap = o;
        }

        // Storage configuration
        if let Ok(data_dir) = env::var("DOCQA_DATA_DIR") {
            self.storage.index_dir = PathBuf::from(data_dir).join("indexes");
        }
        if let Ok(name) = env::var("DOCQA_DEFAULT_INDEX") {
            self.storage.default_index = name;
        }

        // Search configuration
        if let Some(k) = parse_env("DOCQA_DEFAULT_K") {
            self.search.default_k = k;
        }
        if let Some(k) = parse_env("DOCQA_MAX_K") {
            self.search.max_k = k;
        }
        if let Ok(metric) = env::var("DOCQA_METRIC") {
            match metric.parse() {
                Ok(m) => self.search.metric = m,
                Err(e) => tracing::warn!("Ignoring DOCQA_METRIC: {e}"),
            }
        }

        // Model configuration
        if let Ok(url) = env::var("DOCQA_BASE_URL") {
            self.model.base_url = url;
        }
        if let Ok(model) = env::var("DOCQA_EMBEDDING_MODEL") {
            self.model.embedding_model = model;
        }
        if let Ok(model) = env::var("DOCQA_CHAT_MODEL") {
            self.model.chat_model = model;
        }
        if let Some(t) = parse_env("DOCQA_TEMPERATURE") {
            self.model.temperature = t;
        }
        if let Ok(key) = env::var("DOCQA_API_KEY").or_else(|_| env::var("GOOGLE_API_KEY")) {
            if !key.is_empty() {
                self.model.api_key = Some(key);
            }
        }

        // Limits configuration
        if let Some(t) = parse_env("DOCQA_REQUEST_TIMEOUT_SEC") {
            self.limits.request_timeout_sec = t;
        }
        if let Some(r) = parse_env("DOCQA_MAX_RETRIES") {
            self.limits.max_retries = r;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate indexing config
        if self.indexing.chunk_size == 0 {
            return Err(DocQaError::ConfigError(
                "Chunk size must be non-zero".to_string(),
            ));
        }

        if self.indexing.overlap >= self.indexing.chunk_size {
            return Err(DocQaError::ConfigError(
                "Overlap must be less than chunk size".to_string(),
            ));
        }

        // Validate search config
        if self.search.default_k == 0 {
            return Err(DocQaError::ConfigError(
                "Default k must be non-zero".to_string(),
            ));
        }

        if self.search.default_k > self.search.max_k {
            return Err(DocQaError::ConfigError(
                "Default k cannot exceed max k".to_string(),
            ));
        }

        if self.search.max_question_length == 0 {
            return Err(DocQaError::ConfigError(
                "Max question length must be non-zero".to_string(),
            ));
        }

        if self.storage.default_index.is_empty() {
            return Err(DocQaError::ConfigError(
                "Default index name must not be empty".to_string(),
            ));
        }

        // Validate model config
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(DocQaError::ConfigError(format!(
                "Temperature must be between 0 and 2, got {}",
                self.model.temperature
            )));
        }

        if self.model.embed_batch_size == 0 {
            return Err(DocQaError::ConfigError(
                "Embedding batch size must be non-zero".to_string(),
            ));
        }

        // Validate limits config
        if self.limits.request_timeout_sec == 0 {
            return Err(DocQaError::ConfigError(
                "Request timeout must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Chunk size: {} chars", self.indexing.chunk_size);
        tracing::info!("  Overlap: {} chars", self.indexing.overlap);
        tracing::info!("  Index dir: {:?}", self.storage.index_dir);
        tracing::info!("  Default index: {}", self.storage.default_index);
        tracing::info!("  Default k: {}", self.search.default_k);
        tracing::info!("  Max k: {}", self.search.max_k);
        tracing::info!("  Metric: {}", self.search.metric);
        tracing::info!("  Embedding model: {}", self.model.embedding_model);
        tracing::info!("  Chat model: {}", self.model.chat_model);
        tracing::info!("  Temperature: {}", self.model.temperature);
        tracing::info!(
            "  API key: {}",
            if self.model.api_key.is_some() {
                "set"
            } else {
                "not set"
            }
        );
        tracing::info!("  Request timeout: {}s", self.limits.request_timeout_sec);
        tracing::info!("  Max retries: {}", self.limits.max_retries);
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
