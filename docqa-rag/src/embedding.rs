//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};

use crate::error::{RagError, Result};

/// Default number of embedding requests kept in flight by
/// [`EmbeddingProvider::embed_batch`].
pub const DEFAULT_EMBEDDING_CONCURRENCY: usize = 4;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific embedding backend behind a unified async
/// interface. The default
/// [`embed_batch_with_concurrency`](EmbeddingProvider::embed_batch_with_concurrency)
/// fans out [`embed`](EmbeddingProvider::embed) calls with at most the given
/// number in flight and returns the vectors in input order. Backends with
/// native batching should override it.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::EmbeddingProvider;
///
/// let provider = MyEmbeddingProvider::new();
/// let vectors = provider.embed_batch(&["first passage", "second passage"]).await?;
/// assert_eq!(vectors.len(), 2);
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    ///
    /// Implementations must reject empty input with [`RagError::InvalidInput`].
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// The returned vectors correspond one-to-one, in order, with `texts`.
    /// The first failure aborts the batch.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.embed_batch_with_concurrency(texts, self.max_concurrency()).await
    }

    /// Like [`embed_batch`](EmbeddingProvider::embed_batch), with at most
    /// `max_concurrency` requests in flight.
    async fn embed_batch_with_concurrency(
        &self,
        texts: &[&str],
        max_concurrency: usize,
    ) -> Result<Vec<Vec<f32>>> {
        for text in texts {
            ensure_embeddable(text)?;
        }
        let calls: Vec<_> = texts.iter().map(|text| self.embed(text)).collect();
        stream::iter(calls).buffered(max_concurrency.max(1)).try_collect().await
    }

    /// Maximum number of concurrent requests issued by `embed_batch`.
    fn max_concurrency(&self) -> usize {
        DEFAULT_EMBEDDING_CONCURRENCY
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}

/// Reject text that embedding services refuse to embed.
///
/// # Errors
///
/// Returns [`RagError::InvalidInput`] if `text` is empty.
pub fn ensure_embeddable(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(RagError::InvalidInput("cannot embed an empty string".to_string()));
    }
    Ok(())
}
