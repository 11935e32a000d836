//! External model providers.
//!
//! The pipeline talks to two collaborators through capability traits:
//!
//! - **Embedder**: text → fixed-length vectors
//! - **Synthesizer**: question + retrieved context → answer
//!
//! [`gemini`] implements both against the Generative Language API;
//! [`retry`] wraps either one with per-call timeouts and bounded
//! retries. Tests substitute deterministic fakes.

use async_trait::async_trait;

use crate::core::error::Result;

pub mod gemini;
pub mod retry;

pub use gemini::GeminiClient;
pub use retry::{RetryPolicy, RetryingEmbedder, RetryingSynthesizer};

/// What an embedding will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedTask {
    /// Chunks stored in an index
    RetrievalDocument,
    /// A question searched against an index
    RetrievalQuery,
}

impl EmbedTask {
    /// Task type name understood by the embedding API
    pub fn as_api_str(&self) -> &'static str {
        match self {
            EmbedTask::RetrievalDocument => "RETRIEVAL_DOCUMENT",
            EmbedTask::RetrievalQuery => "RETRIEVAL_QUERY",
        }
    }
}

/// Produces embedding vectors for text.
///
/// Implementations return exactly one vector per input, in input
/// order, all of the same dimension for a given model.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String], task: EmbedTask) -> Result<Vec<Vec<f32>>>;

    /// Model identifier recorded in index metadata
    fn model_name(&self) -> &str;

    /// Largest number of texts sent in one request
    fn max_batch_size(&self) -> usize {
        usize::MAX
    }
}

/// Turns a question and its retrieved context into an answer.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, question: &str, context: &str) -> Result<String>;

    fn model_name(&self) -> &str;
}
