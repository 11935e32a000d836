//! Similarity retrieval over a persisted index.

use crate::core::error::{DocQaError, Result};
use crate::core::providers::{EmbedTask, Embedder};
use crate::core::storage::IndexStore;
use crate::core::types::ScoredChunk;
use std::sync::Arc;
use std::time::Instant;

/// Retrieves the chunks most similar to a question
pub struct Retriever {
    store: Arc<IndexStore>,
    embedder: Arc<dyn Embedder>,
    default_k: usize,
    max_k: usize,
    max_question_length: usize,
}

impl Retriever {
    pub fn new(
        store: Arc<IndexStore>,
        embedder: Arc<dyn Embedder>,
        default_k: usize,
        max_k: usize,
        max_question_length: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            default_k,
            max_k,
            max_question_length,
        }
    }

    /// Validate a question before any work is done for it
    pub fn validate_question(&self, question: &str) -> Result<()> {
        if question.trim().is_empty() {
            return Err(DocQaError::InvalidInput(
                "Question cannot be empty".to_string(),
            ));
        }

        let len = question.chars().count();
        if len > self.max_question_length {
            return Err(DocQaError::InvalidInput(format!(
                "Question is {len} characters (max {})",
                self.max_question_length
            )));
        }

        Ok(())
    }

    /// Resolve the requested result count against the configured bounds
    pub fn resolve_k(&self, k: Option<usize>) -> Result<usize> {
        match k {
            Some(0) => Err(DocQaError::InvalidInput(
                "k must be at least 1".to_string(),
            )),
            Some(k) => Ok(k.min(self.max_k)),
            None => Ok(self.default_k.min(self.max_k)),
        }
    }

    /// Return the top-k chunks of `index_name` for `question`
    ///
    /// The index is loaded (and verified) before the question is
    /// embedded, so a missing or corrupt index fails without any
    /// call to the embedding service.
    pub async fn retrieve(
        &self,
        index_name: &str,
        question: &str,
        k: Option<usize>,
    ) -> Result<Vec<ScoredChunk>> {
        let start = Instant::now();

        self.validate_question(question)?;
        let k = self.resolve_k(k)?;

        let index = self.store.load(index_name)?;

        let mut vectors = self
            .embedder
            .embed(&[question.to_string()], EmbedTask::RetrievalQuery)
            .await?;
        if vectors.len() != 1 {
            return Err(DocQaError::embedding(format!(
                "expected 1 query embedding, got {}",
                vectors.len()
            )));
        }
        let query = vectors.swap_remove(0);

        if query.len() != index.dimension() {
            return Err(DocQaError::embedding(format!(
                "query embedding has dimension {} but index '{}' stores {}; \
                 process the documents again with the current embedding model",
                query.len(),
                index_name,
                index.dimension()
            )));
        }

        let results = index.search(&query, k)?;

        tracing::info!(
            "Retrieved {} of {} chunks from '{}' in {}ms",
            results.len(),
            index.len(),
            index_name,
            start.elapsed().as_millis()
        );

        Ok(results)
    }
}
