//! Error types for the `docqa-rag` crate.

use thiserror::Error;

/// Errors that can occur while indexing a document or answering a question.
///
/// Every variant is terminal for the request that produced it. Nothing in this
/// crate retries internally; callers that want backoff wrap the call site.
#[derive(Debug, Error)]
pub enum RagError {
    /// Chunking or pipeline parameters are inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The input cannot be processed, e.g. an empty string sent for embedding.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The embedding service failed, timed out, or returned a malformed response.
    #[error("Embedding service error ({provider}): {message}")]
    EmbeddingService {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Vectors of different lengths were given to the same index.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimension of the index.
        expected: usize,
        /// The offending vector's dimension.
        actual: usize,
    },

    /// An index was built from zero vectors.
    #[error("Cannot build an index from zero vectors")]
    EmptyIndex,

    /// A query was issued but no passages have been indexed.
    #[error("No passages available: upload a non-empty document first")]
    NoPassagesAvailable,

    /// The completion service failed while generating an answer.
    #[error("Completion service error ({provider}): {message}")]
    CompletionService {
        /// The completion provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },
}

impl RagError {
    pub(crate) fn embedding(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingService { provider: provider.into(), message: message.into() }
    }

    pub(crate) fn completion(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CompletionService { provider: provider.into(), message: message.into() }
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
