//! Completion provider trait for the answer-generation service.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that constrain the model.
    System,
    /// The end user's turn.
    User,
    /// A previous model turn.
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(role)
    }
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message.
    pub role: Role,
    /// The message text.
    pub content: String,
}

impl ChatMessage {
    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// A request to the completion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Ordered conversation, system instruction first.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f32,
}

/// A text-generation service consumed through a request/response contract.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{ChatMessage, CompletionProvider, CompletionRequest};
///
/// let request = CompletionRequest {
///     messages: vec![ChatMessage::user("Say hello")],
///     temperature: 0.2,
/// };
/// let text = provider.complete(request).await?;
/// ```
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate the assistant's reply to `request`.
    ///
    /// Failures are reported as [`RagError::CompletionService`](crate::RagError::CompletionService).
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// The model identifier used for generation.
    fn model(&self) -> &str;
}
