//! Grounded answer composition.
//!
//! The [`AnswerComposer`] turns retrieved passages and a question into a
//! completion request whose system instruction restricts the model to the
//! supplied context.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::completion::{ChatMessage, CompletionProvider, CompletionRequest};
use crate::document::{Answer, Passage};
use crate::error::{RagError, Result};

/// System instruction sent with every question.
pub const SYSTEM_INSTRUCTION: &str =
    "You're a helpful assistant answering based only on the provided context.";

/// Separator placed between passages in the prompt context.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Default sampling temperature for grounded answers.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Join passage texts into the prompt context, preserving retrieval order.
pub fn build_context(passages: &[Passage]) -> String {
    passages.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join(CONTEXT_SEPARATOR)
}

/// Build the user prompt carrying the context and the question.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!("Answer based on the following context:\n\n{context}\n\nQuestion: {question}")
}

/// Composes answers through a [`CompletionProvider`].
pub struct AnswerComposer {
    completion_provider: Arc<dyn CompletionProvider>,
    temperature: f32,
}

impl AnswerComposer {
    /// Create a composer with the default temperature.
    pub fn new(completion_provider: Arc<dyn CompletionProvider>) -> Self {
        Self { completion_provider, temperature: DEFAULT_TEMPERATURE }
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// The sampling temperature sent with each request.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Build the completion request for `question` over `passages`.
    pub fn request(&self, question: &str, passages: &[Passage]) -> CompletionRequest {
        let context = build_context(passages);
        CompletionRequest {
            messages: vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::user(build_prompt(&context, question)),
            ],
            temperature: self.temperature,
        }
    }

    /// Generate an answer to `question` grounded on `passages`.
    ///
    /// # Errors
    ///
    /// - [`RagError::InvalidInput`] if `question` is blank.
    /// - [`RagError::CompletionService`] if generation fails.
    pub async fn compose(&self, question: &str, passages: Vec<Passage>) -> Result<Answer> {
        if question.trim().is_empty() {
            return Err(RagError::InvalidInput("question must not be empty".to_string()));
        }

        let request = self.request(question, &passages);
        debug!(
            model = self.completion_provider.model(),
            passage_count = passages.len(),
            "requesting completion"
        );

        let text = self.completion_provider.complete(request).await.inspect_err(|e| {
            error!(error = %e, "answer generation failed");
        })?;

        info!(answer_len = text.len(), source_count = passages.len(), "answer composed");

        Ok(Answer { text, sources: passages })
    }
}
