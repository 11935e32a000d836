//! Unified service container for docqa
//!
//! Provides shared access to storage, the model providers and the
//! two pipeline flows (process and ask).

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::indexer::IngestPipeline;
use crate::core::providers::{
    Embedder, GeminiClient, RetryPolicy, RetryingEmbedder, RetryingSynthesizer, Synthesizer,
};
use crate::core::search::{join_context, Retriever};
use crate::core::session::ChatSession;
use crate::core::storage::{IndexMetadata, IndexStore};
use crate::core::types::{Answer, IngestStats, UploadedDocument};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Unified services container
///
/// The CLI and tests share this one struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Named index storage
    pub store: Arc<IndexStore>,

    /// Embedding provider
    pub embedder: Arc<dyn Embedder>,

    /// Answer provider
    pub synthesizer: Arc<dyn Synthesizer>,

    /// Similarity retrieval
    pub retriever: Arc<Retriever>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services with explicit providers
    pub fn new(
        config: Config,
        embedder: Arc<dyn Embedder>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        let store = Arc::new(IndexStore::new(config.storage.index_dir.clone()));

        let retriever = Arc::new(Retriever::new(
            Arc::clone(&store),
            Arc::clone(&embedder),
            config.search.default_k,
            config.search.max_k,
            config.search.max_question_length,
        ));

        Self {
            store,
            embedder,
            synthesizer,
            retriever,
            config: Arc::new(config),
        }
    }

    /// Create services backed by the Generative Language API
    ///
    /// Both providers run under the configured timeout and retry
    /// policy.
    pub fn from_config(config: Config) -> Result<Self> {
        let policy = RetryPolicy::from_limits(&config.limits);
        let timeout = Duration::from_secs(config.limits.request_timeout_sec);

        let embedder = RetryingEmbedder::new(
            GeminiClient::new(&config.model, timeout)?,
            policy.clone(),
        );
        let synthesizer =
            RetryingSynthesizer::new(GeminiClient::new(&config.model, timeout)?, policy);

        Ok(Self::new(config, Arc::new(embedder), Arc::new(synthesizer)))
    }

    /// Resolve an optional index name to the configured default
    pub fn index_name<'a>(&'a self, name: Option<&'a str>) -> &'a str {
        name.unwrap_or(&self.config.storage.default_index)
    }

    /// Create an IngestPipeline, optionally overriding chunking
    pub fn create_pipeline(
        &self,
        chunk_size: Option<usize>,
        overlap: Option<usize>,
    ) -> Result<IngestPipeline> {
        IngestPipeline::new(
            chunk_size.unwrap_or(self.config.indexing.chunk_size),
            overlap.unwrap_or(self.config.indexing.overlap),
            self.config.search.metric,
            Arc::clone(&self.embedder),
        )
    }

    /// Process documents into a named index
    ///
    /// The previous index with that name is replaced only after
    /// every step succeeded; on any error it is left untouched.
    pub async fn process(
        &self,
        index: Option<&str>,
        documents: &[UploadedDocument],
        chunk_size: Option<usize>,
        overlap: Option<usize>,
    ) -> Result<IngestStats> {
        let start = Instant::now();
        let name = self.index_name(index);
        IndexStore::validate_name(name)?;

        let pipeline = self.create_pipeline(chunk_size, overlap)?;
        let (vector_index, mut stats) = pipeline.run(documents).await?;
        stats.index = name.to_string();

        let metadata = IndexMetadata::from_ingest(
            &stats,
            &vector_index,
            pipeline.chunker().chunk_size(),
            pipeline.chunker().overlap(),
            self.embedder.model_name(),
        );
        self.store.save(name, &vector_index, metadata)?;

        stats.duration_ms = start.elapsed().as_millis() as u64;
        Ok(stats)
    }

    /// Answer a question from a named index
    pub async fn ask(&self, index: Option<&str>, question: &str, k: Option<usize>) -> Result<Answer> {
        let start = Instant::now();
        let name = self.index_name(index);

        let context = self.retriever.retrieve(name, question, k).await?;
        let answer = self
            .synthesizer
            .synthesize(question, &join_context(&context))
            .await?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Answered question against '{}' with {} chunks in {}ms",
            name,
            context.len(),
            duration_ms
        );

        Ok(Answer {
            question: question.to_string(),
            answer,
            index: name.to_string(),
            context,
            duration_ms,
        })
    }

    /// Answer a question and record the exchange in `session`
    pub async fn ask_in_session(
        &self,
        session: &mut ChatSession,
        question: &str,
        k: Option<usize>,
    ) -> Result<Answer> {
        let answer = self.ask(Some(&session.index), question, k).await?;
        session.record(question, answer.answer.clone());
        Ok(answer)
    }
}
