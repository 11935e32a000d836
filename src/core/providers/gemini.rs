//! Generative Language API client.
//!
//! One HTTP client serves both roles: batch embeddings for chunks and
//! questions, and single-turn content generation for answers.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::config::ModelConfig;
use crate::core::error::{DocQaError, Result};
use crate::core::providers::{EmbedTask, Embedder, Synthesizer};
use crate::core::search::prompt;

const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Which service a failed call belongs to
#[derive(Debug, Clone, Copy)]
enum Service {
    Embedding,
    Synthesis,
}

impl Service {
    fn error(self, message: String, retryable: bool) -> DocQaError {
        match self {
            Service::Embedding => DocQaError::EmbeddingService { message, retryable },
            Service::Synthesis => DocQaError::SynthesisService { message, retryable },
        }
    }
}

/// Client for the Generative Language HTTP API
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    embedding_model: String,
    chat_model: String,
    temperature: f32,
    batch_size: usize,
}

impl GeminiClient {
    /// Build a client from model settings
    ///
    /// A missing API key is not an error here; each call fails with
    /// `ConfigError` instead, so index maintenance commands keep
    /// working without credentials.
    pub fn new(config: &ModelConfig, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DocQaError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            embedding_model: model_path(&config.embedding_model),
            chat_model: model_path(&config.chat_model),
            temperature: config.temperature,
            batch_size: config.embed_batch_size.max(1),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            DocQaError::ConfigError(
                "No API key configured (set GOOGLE_API_KEY or DOCQA_API_KEY)".to_string(),
            )
        })
    }

    fn url(&self, model: &str, method: &str) -> String {
        format!("{}/{API_VERSION}/{model}:{method}", self.base_url)
    }

    async fn post<B, R>(&self, url: &str, body: &B, service: Service) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let api_key = self.api_key()?;
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| service.error(format!("request failed: {e}"), is_transient(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let description = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(service.error(
                format!("{status}: {}", description.trim()),
                should_retry(status),
            ));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| service.error(format!("unreadable response: {e}"), false))
    }

    async fn embed_batch(&self, texts: &[String], task: EmbedTask) -> Result<Vec<Vec<f32>>> {
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedRequest {
                    model: &self.embedding_model,
                    content: Content::from_text(text),
                    task_type: task.as_api_str(),
                })
                .collect(),
        };

        let url = self.url(&self.embedding_model, "batchEmbedContents");
        let response: BatchEmbedResponse = self.post(&url, &request, Service::Embedding).await?;

        if response.embeddings.len() != texts.len() {
            return Err(DocQaError::embedding(format!(
                "returned {} embeddings for {} inputs",
                response.embeddings.len(),
                texts.len()
            )));
        }

        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }
}

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed(&self, texts: &[String], task: EmbedTask) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for (i, batch) in texts.chunks(self.batch_size).enumerate() {
            tracing::debug!("Embedding batch {} ({} texts)", i + 1, batch.len());
            vectors.extend(self.embed_batch(batch, task).await?);
        }

        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        &self.embedding_model
    }

    fn max_batch_size(&self) -> usize {
        self.batch_size
    }
}

#[async_trait]
impl Synthesizer for GeminiClient {
    async fn synthesize(&self, question: &str, context: &str) -> Result<String> {
        let prompt = prompt::render(question, context);
        let request = GenerateRequest {
            contents: vec![Content::from_text(&prompt)],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let url = self.url(&self.chat_model, "generateContent");
        let response: GenerateResponse = self.post(&url, &request, Service::Synthesis).await?;

        response.into_text()
    }

    fn model_name(&self) -> &str {
        &self.chat_model
    }
}

/// Prefix bare model names with `models/`
fn model_path(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn from_text(text: &'a str) -> Self {
        Self {
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: &'static str,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Debug, Deserialize)]
struct Embedding {
    #[serde(default)]
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<Embedding>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: ResponseContent,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateResponse {
    /// Concatenate the text parts of the first candidate
    fn into_text(self) -> Result<String> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);

        let candidate = match self.candidates.into_iter().next() {
            Some(c) => c,
            None => {
                return Err(DocQaError::synthesis(match block_reason {
                    Some(reason) => format!("prompt blocked: {reason}"),
                    None => "response contained no candidates".to_string(),
                }))
            }
        };

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            return Err(DocQaError::synthesis(format!(
                "empty answer (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}
