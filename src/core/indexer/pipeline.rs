//! Ingest pipeline orchestration.
//!
//! Coordinates the end-to-end ingest workflow:
//! 1. Extract text from the uploaded PDFs
//! 2. Chunk the concatenated text
//! 3. Embed every chunk
//! 4. Build the in-memory vector index
//!
//! Nothing is persisted here. The caller saves the returned index
//! only when every step succeeded.

use std::sync::Arc;
use std::time::Instant;

use crate::core::error::{DocQaError, Result};
use crate::core::indexer::{Chunker, PdfExtractor};
use crate::core::providers::{EmbedTask, Embedder};
use crate::core::storage::{Metric, VectorIndex};
use crate::core::types::{IngestStats, UploadedDocument};

/// Message returned when processing is requested with no documents
pub const NO_DOCUMENTS_MESSAGE: &str = "Please upload at least one PDF document.";

/// Orchestrates the ingest pipeline
pub struct IngestPipeline {
    extractor: PdfExtractor,
    chunker: Chunker,
    embedder: Arc<dyn Embedder>,
    metric: Metric,
}

impl IngestPipeline {
    /// Create a new ingest pipeline
    ///
    /// Fails with `ConfigError` for an invalid chunk size / overlap
    /// pair, before any document is read.
    pub fn new(
        chunk_size: usize,
        overlap: usize,
        metric: Metric,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        Ok(Self {
            extractor: PdfExtractor::new(),
            chunker: Chunker::new(chunk_size, overlap)?,
            embedder,
            metric,
        })
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Run documents through extraction, chunking and embedding
    ///
    /// # Returns
    ///
    /// The built index and ingest statistics. `stats.index` is left
    /// empty for the caller to fill in.
    pub async fn run(&self, documents: &[UploadedDocument]) -> Result<(VectorIndex, IngestStats)> {
        let start = Instant::now();

        if documents.is_empty() {
            return Err(DocQaError::InvalidInput(NO_DOCUMENTS_MESSAGE.to_string()));
        }

        // Step 1: Extract
        tracing::info!("Extracting text from {} documents", documents.len());
        let extracted = self.extractor.extract(documents);
        if !extracted.has_text() {
            return Err(DocQaError::NoExtractableText);
        }

        // Step 2: Chunk
        let chunks = self.chunker.chunk_text(&extracted.text);
        tracing::info!(
            "Chunked {} chars into {} chunks (size {}, overlap {})",
            extracted.char_count(),
            chunks.len(),
            self.chunker.chunk_size(),
            self.chunker.overlap()
        );

        // Step 3: Embed
        let texts: Vec<String> = chunks.into_iter().map(|c| c.text).collect();
        let vectors = self
            .embedder
            .embed(&texts, EmbedTask::RetrievalDocument)
            .await?;
        if vectors.len() != texts.len() {
            return Err(DocQaError::embedding(format!(
                "returned {} vectors for {} chunks",
                vectors.len(),
                texts.len()
            )));
        }
        tracing::info!(
            "Embedded {} chunks with {}",
            texts.len(),
            self.embedder.model_name()
        );

        // Step 4: Build
        let chunks_created = texts.len();
        let index = VectorIndex::build(self.metric, texts, vectors)
            .map_err(|e| DocQaError::embedding(format!("unusable embeddings: {e}")))?;

        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Ingest complete: {} documents ({} skipped), {} pages ({} skipped), \
             {} chunks, dimension {} in {}ms",
            documents.len(),
            extracted.documents_skipped,
            extracted.pages,
            extracted.pages_skipped,
            chunks_created,
            index.dimension(),
            duration_ms
        );

        let stats = IngestStats {
            index: String::new(), // Filled by caller
            documents: documents.len(),
            documents_skipped: extracted.documents_skipped,
            pages: extracted.pages,
            pages_skipped: extracted.pages_skipped,
            characters: extracted.char_count(),
            chunks_created,
            dimension: index.dimension(),
            duration_ms,
        };

        Ok((index, stats))
    }
}
