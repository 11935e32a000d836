//! Error types and error handling for the docqa pipeline.
//!
//! This module defines the error types used throughout the
//! application. Every flow (ingest or query) aborts on the first
//! error it returns; per-page extraction failures are the only
//! errors that are logged and swallowed instead.

use thiserror::Error;

/// Result type alias for docqa operations
pub type Result<T> = std::result::Result<T, DocQaError>;

/// Main error type for the docqa pipeline
#[derive(Error, Debug)]
pub enum DocQaError {
    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Embedding service error: {message}")]
    EmbeddingService { message: String, retryable: bool },

    #[error("Synthesis service error: {message}")]
    SynthesisService { message: String, retryable: bool },

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Index corrupt: {0}")]
    IndexCorrupt(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No extractable text found in the uploaded documents")]
    NoExtractableText,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl DocQaError {
    /// Build a non-retryable embedding service error
    pub fn embedding(message: impl Into<String>) -> Self {
        DocQaError::EmbeddingService {
            message: message.into(),
            retryable: false,
        }
    }

    /// Build a non-retryable synthesis service error
    pub fn synthesis(message: impl Into<String>) -> Self {
        DocQaError::SynthesisService {
            message: message.into(),
            retryable: false,
        }
    }

    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocQaError::IndexNotFound(_))
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            DocQaError::InvalidInput(_) | DocQaError::ConfigError(_) | DocQaError::NoExtractableText
        )
    }

    /// Check if an external call that produced this error may be retried
    pub fn is_retryable(&self) -> bool {
        match self {
            DocQaError::EmbeddingService { retryable, .. }
            | DocQaError::SynthesisService { retryable, .. } => *retryable,
            _ => false,
        }
    }
}
