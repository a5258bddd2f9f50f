//! Retrieval pipeline for answering questions about a single uploaded document.
//!
//! This crate provides:
//! - Fixed-size, overlapping character chunking ([`FixedSizeChunker`])
//! - An async embedding contract with order-preserving bounded-concurrency batching
//!   ([`EmbeddingProvider`])
//! - An exact squared-L2 nearest-neighbour index ([`FlatL2Index`])
//! - Retrieval orchestration over a per-document [`IndexHandle`] ([`Retriever`])
//! - Grounded answer composition through a [`CompletionProvider`] ([`AnswerComposer`])
//! - A per-upload [`Session`] state machine
//! - OpenAI-compatible HTTP providers (feature `openai`, enabled by default)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa_rag::openai::{OpenAICompletionProvider, OpenAIConfig, OpenAIEmbeddingProvider};
//! use docqa_rag::{AnswerComposer, RagConfig, Retriever, Session};
//!
//! let openai = OpenAIConfig::new(api_key);
//! let retriever = Retriever::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(OpenAIEmbeddingProvider::new(openai.clone())?))
//!     .build()?;
//! let composer = AnswerComposer::new(Arc::new(OpenAICompletionProvider::new(openai)?));
//!
//! let mut session = Session::new(Arc::new(retriever), Arc::new(composer));
//! session.upload(&text).await?;
//! let answer = session.ask("What color is grass?").await?;
//! ```

pub mod answer;
pub mod chunking;
pub mod completion;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
#[cfg(feature = "openai")]
pub mod openai;
pub mod retriever;
pub mod session;

pub use answer::AnswerComposer;
pub use chunking::{FixedSizeChunker, chunk};
pub use completion::{ChatMessage, CompletionProvider, CompletionRequest, Role};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Answer, Passage, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::{FlatL2Index, Neighbor};
pub use retriever::{IndexHandle, Retriever, RetrieverBuilder};
pub use session::{Session, SessionState};
