// Test helper functions: deterministic providers and service setup

use async_trait::async_trait;
use docqa::core::config::Config;
use docqa::core::error::{DocQaError, Result};
use docqa::core::providers::{EmbedTask, Embedder, Synthesizer};
use docqa::core::services::Services;
use docqa::core::types::{IngestStats, UploadedDocument};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Dimension of `HashEmbedder` vectors
#[allow(dead_code)] // Used in integration tests
pub const HASH_DIM: usize = 64;

/// Bag-of-words embedder: each lowercase word is hashed into one of
/// `HASH_DIM` buckets and the counts are normalized to unit length.
///
/// Texts sharing words land close together, so retrieval behaves
/// sensibly without a network service.
#[allow(dead_code)] // Used in integration tests
#[derive(Default)]
pub struct HashEmbedder {
    pub calls: AtomicUsize,
}

#[allow(dead_code)] // Used in integration tests
pub fn hash_embed(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; HASH_DIM];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
    {
        // FNV-1a
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in word.to_lowercase().bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        vector[(hash % HASH_DIM as u64) as usize] += 1.0;
    }

    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
    vector
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, texts: &[String], _task: EmbedTask) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| hash_embed(t)).collect())
    }

    fn model_name(&self) -> &str {
        "models/hash-test"
    }
}

/// Embedder whose service is always down
#[allow(dead_code)] // Used in integration tests
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _texts: &[String], _task: EmbedTask) -> Result<Vec<Vec<f32>>> {
        Err(DocQaError::EmbeddingService {
            message: "HTTP 503: service unavailable".to_string(),
            retryable: true,
        })
    }

    fn model_name(&self) -> &str {
        "models/failing-test"
    }
}

/// Synthesizer that echoes its context, recording every call
#[allow(dead_code)] // Used in integration tests
#[derive(Default)]
pub struct EchoSynthesizer {
    pub contexts: Mutex<Vec<String>>,
}

#[async_trait]
impl Synthesizer for EchoSynthesizer {
    async fn synthesize(&self, question: &str, context: &str) -> Result<String> {
        self.contexts
            .lock()
            .expect("lock poisoned")
            .push(context.to_string());
        Ok(format!("Answer to '{question}' from: {context}"))
    }

    fn model_name(&self) -> &str {
        "models/echo-test"
    }
}

/// Synthesizer whose service rejects every request
#[allow(dead_code)] // Used in integration tests
pub struct FailingSynthesizer;

#[async_trait]
impl Synthesizer for FailingSynthesizer {
    async fn synthesize(&self, _question: &str, _context: &str) -> Result<String> {
        Err(DocQaError::synthesis("HTTP 400: request blocked"))
    }

    fn model_name(&self) -> &str {
        "models/failing-test"
    }
}

/// Config with storage under `dir` and small chunks suited to the fixtures
#[allow(dead_code)] // Used in integration tests
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.storage.index_dir = dir.to_path_buf();
    config.indexing.chunk_size = 120;
    config.indexing.overlap = 20;
    config
}

/// Create test services with deterministic providers and temporary storage
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services() -> (Services, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let services = Services::new(
        test_config(temp_dir.path()),
        Arc::new(HashEmbedder::default()),
        Arc::new(EchoSynthesizer::default()),
    );
    (services, temp_dir)
}

/// Create services sharing `dir` with custom providers
#[allow(dead_code)] // Used in integration tests
pub fn services_with(
    dir: &Path,
    embedder: Arc<dyn Embedder>,
    synthesizer: Arc<dyn Synthesizer>,
) -> Services {
    Services::new(test_config(dir), embedder, synthesizer)
}

/// Wrap raw PDF bytes as an upload
#[allow(dead_code)] // Used in integration tests
pub fn upload(name: &str, bytes: Vec<u8>) -> UploadedDocument {
    UploadedDocument::new(name, bytes)
}

/// Assert that ingest stats are valid
#[allow(dead_code)] // Used in integration tests
pub fn assert_valid_stats(stats: &IngestStats) {
    assert!(
        stats.chunks_created > 0,
        "Expected chunks_created > 0, got {}",
        stats.chunks_created
    );
    assert!(
        stats.pages > stats.pages_skipped,
        "Expected some pages with text, got {} of {} skipped",
        stats.pages_skipped,
        stats.pages
    );
    assert_eq!(stats.dimension, HASH_DIM);
}
