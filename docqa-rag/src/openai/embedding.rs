//! OpenAI embedding provider using the `/embeddings` endpoint.

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{OpenAIConfig, describe_request_error, error_detail};
use crate::config::DEFAULT_EMBEDDING_MODEL;
use crate::embedding::{DEFAULT_EMBEDDING_CONCURRENCY, EmbeddingProvider, ensure_embeddable};
use crate::error::{RagError, Result};

const PROVIDER: &str = "OpenAI";

/// Dimensionality of `text-embedding-ada-002`.
const DEFAULT_DIMENSIONS: usize = 1536;

/// Maximum number of inputs sent in one request.
const DEFAULT_MAX_BATCH_SIZE: usize = 256;

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings API.
///
/// Large batches are split into requests of at most `max_batch_size` inputs,
/// which are issued with at most `max_concurrency` in flight. Vectors come
/// back in input order.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::openai::{OpenAIConfig, OpenAIEmbeddingProvider};
///
/// let provider = OpenAIEmbeddingProvider::new(OpenAIConfig::new("sk-..."))?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    config: OpenAIConfig,
    model: String,
    dimensions: usize,
    max_batch_size: usize,
    max_concurrency: usize,
}

impl OpenAIEmbeddingProvider {
    /// Create a new provider using the default model (`text-embedding-ada-002`).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if the API key is empty or
    /// the HTTP client cannot be built.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = config.http_client()?;
        Ok(Self {
            client,
            config,
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_concurrency: DEFAULT_EMBEDDING_CONCURRENCY,
        })
    }

    /// Set the model name (e.g. `text-embedding-3-small`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the dimensionality reported by [`dimensions()`](EmbeddingProvider::dimensions).
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self
    }

    /// Set the maximum number of inputs per request.
    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size.max(1);
        self
    }

    /// Set the maximum number of requests in flight.
    pub fn with_max_concurrency(mut self, concurrency: usize) -> Self {
        self.max_concurrency = concurrency.max(1);
        self
    }

    /// The model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        debug!(provider = PROVIDER, batch_size = texts.len(), model = %self.model, "embedding batch");

        let request_body = EmbeddingRequest { model: &self.model, input: texts };

        let response = self
            .client
            .post(self.config.endpoint("embeddings"))
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                RagError::embedding(PROVIDER, describe_request_error(&e, self.config.timeout))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(provider = PROVIDER, %status, "API error");
            return Err(RagError::embedding(PROVIDER, format!("API returned {status}: {detail}")));
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            RagError::embedding(PROVIDER, format!("failed to parse response: {e}"))
        })?;

        order_embeddings(embedding_response.data, texts.len())
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Place each returned vector at its `index`, checking that every input got exactly one.
fn order_embeddings(data: Vec<EmbeddingData>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(RagError::embedding(
            PROVIDER,
            format!("expected {expected} embeddings, got {}", data.len()),
        ));
    }

    let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected];
    for item in data {
        let slot = slots.get_mut(item.index).ok_or_else(|| {
            RagError::embedding(PROVIDER, format!("embedding index {} out of range", item.index))
        })?;
        if slot.replace(item.embedding).is_some() {
            return Err(RagError::embedding(
                PROVIDER,
                format!("duplicate embedding index {}", item.index),
            ));
        }
    }

    // Every slot is filled: lengths match and no index repeated.
    Ok(slots.into_iter().flatten().collect())
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        ensure_embeddable(text)?;
        debug!(provider = PROVIDER, text_len = text.len(), "embedding single text");

        let results = self.request(&[text]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| RagError::embedding(PROVIDER, "API returned empty response"))
    }

    async fn embed_batch_with_concurrency(
        &self,
        texts: &[&str],
        max_concurrency: usize,
    ) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        for text in texts {
            ensure_embeddable(text)?;
        }

        let requests: Vec<BoxFuture<'_, Result<Vec<Vec<f32>>>>> =
            texts.chunks(self.max_batch_size).map(|batch| self.request(batch).boxed()).collect();
        let batches: Vec<Vec<Vec<f32>>> =
            stream::iter(requests).buffered(max_concurrency.max(1)).try_collect().await?;

        Ok(batches.into_iter().flatten().collect())
    }

    fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
