//! Retrieval orchestrator.
//!
//! The [`Retriever`] coordinates indexing (chunk → embed → build) and query
//! execution (embed → search → map positions back to passages) by composing a
//! [`FixedSizeChunker`], an [`EmbeddingProvider`] and a [`FlatL2Index`].
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa_rag::{RagConfig, Retriever};
//!
//! let retriever = Retriever::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .build()?;
//!
//! let handle = retriever.index_document(&text).await?;
//! let passages = retriever.query(&handle, "What color is grass?").await?;
//! ```

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::chunking::FixedSizeChunker;
use crate::config::RagConfig;
use crate::document::{Passage, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::FlatL2Index;

/// A built index together with the passages it was built from.
///
/// Position `i` in the index corresponds to `passages()[i]`. A handle for an
/// empty document holds no index and no passages.
#[derive(Debug, Clone)]
pub struct IndexHandle {
    index: Option<FlatL2Index>,
    passages: Vec<Passage>,
}

impl IndexHandle {
    /// Bundle an index with its passages.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidInput`] if the index and the passages
    /// disagree in length.
    pub fn new(index: FlatL2Index, passages: Vec<Passage>) -> Result<Self> {
        if index.len() != passages.len() {
            return Err(RagError::InvalidInput(format!(
                "index holds {} vectors but {} passages were given",
                index.len(),
                passages.len()
            )));
        }
        Ok(Self { index: Some(index), passages })
    }

    /// A handle for a document that produced no passages.
    pub fn empty() -> Self {
        Self { index: None, passages: Vec::new() }
    }

    /// The indexed passages in document order.
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// The underlying index, absent for an empty document.
    pub fn index(&self) -> Option<&FlatL2Index> {
        self.index.as_ref()
    }

    /// Whether the handle holds no passages.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

/// The retrieval orchestrator.
///
/// Construct one via [`Retriever::builder()`]. A retriever holds no
/// per-document state; every call operates on the [`IndexHandle`] it is given.
pub struct Retriever {
    config: RagConfig,
    chunker: FixedSizeChunker,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    /// Create a new [`RetrieverBuilder`].
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::default()
    }

    /// Return a reference to the configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Index a document: chunk → embed (batch) → build.
    ///
    /// At most `embedding_concurrency` embedding requests are in flight.
    ///
    /// An empty document yields an empty handle rather than an error; querying
    /// it reports [`RagError::NoPassagesAvailable`].
    ///
    /// # Errors
    ///
    /// - [`RagError::EmbeddingService`] if embedding fails or the provider
    ///   returns the wrong number of vectors.
    /// - [`RagError::DimensionMismatch`] if the provider returns vectors of
    ///   differing lengths.
    pub async fn index_document(&self, text: &str) -> Result<IndexHandle> {
        let passages = self.chunker.chunk(text);
        if passages.is_empty() {
            info!(passage_count = 0, "indexed document (empty)");
            return Ok(IndexHandle::empty());
        }

        let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();
        debug!(passage_count = texts.len(), "embedding passages");

        let vectors = self
            .embedding_provider
            .embed_batch_with_concurrency(&texts, self.config.embedding_concurrency)
            .await
            .inspect_err(|e| {
                error!(error = %e, "embedding failed during indexing");
            })?;

        if vectors.len() != passages.len() {
            error!(
                expected = passages.len(),
                actual = vectors.len(),
                "embedding provider returned wrong number of vectors"
            );
            return Err(RagError::embedding(
                "pipeline",
                format!("expected {} vectors, got {}", passages.len(), vectors.len()),
            ));
        }

        let index = FlatL2Index::build(vectors).inspect_err(|e| {
            error!(error = %e, "index construction failed");
        })?;

        info!(
            passage_count = passages.len(),
            dimensions = index.dimensions(),
            "indexed document"
        );

        IndexHandle::new(index, passages)
    }

    /// Retrieve the configured top-K passages for `question`, closest first.
    ///
    /// # Errors
    ///
    /// See [`Retriever::search`].
    pub async fn query(&self, handle: &IndexHandle, question: &str) -> Result<Vec<Passage>> {
        self.query_with_top_k(handle, question, self.config.top_k).await
    }

    /// Retrieve up to `top_k` passages for `question`, closest first.
    ///
    /// # Errors
    ///
    /// See [`Retriever::search`].
    pub async fn query_with_top_k(
        &self,
        handle: &IndexHandle,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<Passage>> {
        let results = self.search(handle, question, top_k).await?;
        Ok(results.into_iter().map(|r| r.passage).collect())
    }

    /// Embed `question` and return up to `top_k` passages with their distances.
    ///
    /// # Errors
    ///
    /// - [`RagError::NoPassagesAvailable`] if the handle is empty.
    /// - [`RagError::InvalidInput`] if `question` is empty.
    /// - [`RagError::EmbeddingService`] if the question cannot be embedded.
    /// - [`RagError::DimensionMismatch`] if the question vector does not match
    ///   the index.
    pub async fn search(
        &self,
        handle: &IndexHandle,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let Some(index) = handle.index() else {
            return Err(RagError::NoPassagesAvailable);
        };

        let query_embedding = self.embedding_provider.embed(question).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during query");
        })?;

        let neighbors = index.search(&query_embedding, top_k).inspect_err(|e| {
            error!(error = %e, "index search failed");
        })?;

        let results: Vec<SearchResult> = neighbors
            .into_iter()
            .filter_map(|n| {
                handle
                    .passages
                    .get(n.position)
                    .map(|p| SearchResult { passage: p.clone(), distance: n.distance })
            })
            .collect();

        info!(top_k, result_count = results.len(), "query completed");

        Ok(results)
    }
}

/// Builder for constructing a [`Retriever`].
///
/// The embedding provider is required; the configuration defaults to
/// [`RagConfig::default()`].
#[derive(Default)]
pub struct RetrieverBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl RetrieverBuilder {
    /// Set the configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Build the [`Retriever`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if the embedding provider is
    /// missing or the configuration does not validate.
    pub fn build(self) -> Result<Retriever> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let embedding_provider = self.embedding_provider.ok_or_else(|| {
            RagError::InvalidConfiguration("embedding_provider is required".to_string())
        })?;
        let chunker = FixedSizeChunker::new(config.chunk_size, config.chunk_overlap)?;

        Ok(Retriever { config, chunker, embedding_provider })
    }
}
