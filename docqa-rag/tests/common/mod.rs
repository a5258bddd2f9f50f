//! Deterministic providers shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use docqa_rag::embedding::ensure_embeddable;
use docqa_rag::{CompletionProvider, CompletionRequest, EmbeddingProvider, RagError, Result};

/// Bag-of-words embedder over a fixed vocabulary.
///
/// Each vocabulary word owns one dimension; the vector holds word counts.
/// Words outside the vocabulary are ignored.
pub struct VocabularyEmbedder {
    vocabulary: Vec<&'static str>,
    pub calls: AtomicUsize,
}

impl VocabularyEmbedder {
    pub fn new(vocabulary: &[&'static str]) -> Self {
        Self { vocabulary: vocabulary.to_vec(), calls: AtomicUsize::new(0) }
    }

    pub fn colors() -> Self {
        Self::new(&[
            "what", "color", "is", "the", "sky", "blue", "grass", "green", "cats", "chase", "mice",
        ])
    }
}

#[async_trait]
impl EmbeddingProvider for VocabularyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        ensure_embeddable(text)?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut vector = vec![0.0; self.vocabulary.len()];
        for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            let word = word.to_lowercase();
            if let Some(slot) = self.vocabulary.iter().position(|v| *v == word) {
                vector[slot] += 1.0;
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Embedder that always fails, as if the service were unreachable.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RagError::EmbeddingService {
            provider: "test".to_string(),
            message: "connection refused".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        4
    }
}

/// Vocabulary embedder that can be switched into a failing state.
pub struct SwitchableEmbedder {
    inner: VocabularyEmbedder,
    pub failing: AtomicBool,
}

impl SwitchableEmbedder {
    pub fn colors() -> Self {
        Self { inner: VocabularyEmbedder::colors(), failing: AtomicBool::new(false) }
    }
}

#[async_trait]
impl EmbeddingProvider for SwitchableEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.failing.load(Ordering::SeqCst) {
            return FailingEmbedder.embed(text).await;
        }
        self.inner.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }
}

/// Embedder whose batch drops the last vector.
pub struct ShortBatchEmbedder;

#[async_trait]
impl EmbeddingProvider for ShortBatchEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![1.0, 0.0])
    }

    async fn embed_batch_with_concurrency(
        &self,
        texts: &[&str],
        _max_concurrency: usize,
    ) -> Result<Vec<Vec<f32>>> {
        Ok(vec![vec![1.0, 0.0]; texts.len().saturating_sub(1)])
    }

    fn dimensions(&self) -> usize {
        2
    }
}

/// Embedder that tracks how many `embed` calls overlap.
///
/// Keeps the trait's default `max_concurrency()`, so any lower bound observed
/// comes from the caller.
pub struct InFlightEmbedder {
    in_flight: AtomicUsize,
    pub peak: AtomicUsize,
}

impl InFlightEmbedder {
    pub fn new() -> Self {
        Self { in_flight: AtomicUsize::new(0), peak: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl EmbeddingProvider for InFlightEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        ensure_embeddable(text)?;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![text.len() as f32, 1.0])
    }

    fn dimensions(&self) -> usize {
        2
    }
}

/// Completion provider that records requests and replies with a fixed answer.
pub struct RecordingCompletion {
    reply: Result<String>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl RecordingCompletion {
    pub fn replying(reply: &str) -> Self {
        Self { reply: Ok(reply.to_string()), requests: Mutex::new(Vec::new()) }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(RagError::CompletionService {
                provider: "test".to_string(),
                message: message.to_string(),
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionProvider for RecordingCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(RagError::CompletionService { provider, message }) => {
                Err(RagError::CompletionService {
                    provider: provider.clone(),
                    message: message.clone(),
                })
            }
            Err(other) => Err(RagError::InvalidInput(other.to_string())),
        }
    }

    fn model(&self) -> &str {
        "test-model"
    }
}
