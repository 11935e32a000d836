//! Timeout and retry wrappers for providers.
//!
//! Every external call runs under `tokio::time::timeout`. A call that
//! times out or fails with a retryable error is attempted again after
//! an exponential backoff, up to `max_retries` extra attempts.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::core::config::LimitsConfig;
use crate::core::error::{DocQaError, Result};
use crate::core::providers::{EmbedTask, Embedder, Synthesizer};

/// Backoff exponent cap (delay stops growing after 2^5 × base)
const MAX_BACKOFF_EXPONENT: u32 = 5;

/// Retry and timeout settings for external calls
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each later one
    pub base_delay: Duration,

    /// Bound on a single attempt
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_limits(&LimitsConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_limits(limits: &LimitsConfig) -> Self {
        Self {
            max_retries: limits.max_retries,
            base_delay: Duration::from_millis(limits.retry_base_delay_ms),
            timeout: Duration::from_secs(limits.request_timeout_sec),
        }
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
        self.base_delay * (1u32 << exponent)
    }

    /// Run `call` under this policy
    ///
    /// `on_timeout` builds the error reported when an attempt runs
    /// past the timeout; such errors count as retryable.
    pub async fn run<T, F, Fut>(
        &self,
        what: &str,
        on_timeout: fn(String) -> DocQaError,
        mut call: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0u32;

        loop {
            let result = match tokio::time::timeout(self.timeout, call()).await {
                Ok(result) => result,
                Err(_) => Err(on_timeout(format!(
                    "{what} timed out after {}s",
                    self.timeout.as_secs_f64()
                ))),
            };

            match result {
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        "{} failed ({}); retry {}/{} in {}ms",
                        what,
                        e,
                        attempt,
                        self.max_retries,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }
}

fn embedding_timeout(message: String) -> DocQaError {
    DocQaError::EmbeddingService {
        message,
        retryable: true,
    }
}

fn synthesis_timeout(message: String) -> DocQaError {
    DocQaError::SynthesisService {
        message,
        retryable: true,
    }
}

/// Embedder decorator applying a [`RetryPolicy`]
///
/// Input is split into the inner embedder's batches, and the policy
/// applies to each batch on its own. A retry re-sends only the batch
/// that failed.
pub struct RetryingEmbedder<E> {
    inner: E,
    policy: RetryPolicy,
}

impl<E: Embedder> RetryingEmbedder<E> {
    pub fn new(inner: E, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<E: Embedder> Embedder for RetryingEmbedder<E> {
    async fn embed(&self, texts: &[String], task: EmbedTask) -> Result<Vec<Vec<f32>>> {
        let batch_size = self.inner.max_batch_size().max(1);
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(batch_size) {
            let embedded = self
                .policy
                .run("embedding request", embedding_timeout, || {
                    self.inner.embed(batch, task)
                })
                .await?;
            vectors.extend(embedded);
        }

        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    fn max_batch_size(&self) -> usize {
        self.inner.max_batch_size()
    }
}

/// Synthesizer decorator applying a [`RetryPolicy`]
pub struct RetryingSynthesizer<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: Synthesizer> RetryingSynthesizer<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<S: Synthesizer> Synthesizer for RetryingSynthesizer<S> {
    async fn synthesize(&self, question: &str, context: &str) -> Result<String> {
        self.policy
            .run("synthesis request", synthesis_timeout, || {
                self.inner.synthesize(question, context)
            })
            .await
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
