//! OpenAI completion provider using the `/chat/completions` endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{OpenAIConfig, describe_request_error, error_detail};
use crate::completion::{ChatMessage, CompletionProvider, CompletionRequest};
use crate::config::DEFAULT_COMPLETION_MODEL;
use crate::error::{RagError, Result};

const PROVIDER: &str = "OpenAI";

/// A [`CompletionProvider`] backed by the OpenAI chat completions API.
///
/// Sends a single non-streaming request per call and returns the first
/// choice's message content.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::openai::{OpenAICompletionProvider, OpenAIConfig};
///
/// let provider = OpenAICompletionProvider::new(OpenAIConfig::new("sk-..."))?
///     .with_model("gpt-4o-mini");
/// ```
pub struct OpenAICompletionProvider {
    client: reqwest::Client,
    config: OpenAIConfig,
    model: String,
}

impl OpenAICompletionProvider {
    /// Create a new provider using the default model (`gpt-3.5-turbo`).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if the API key is empty or
    /// the HTTP client cannot be built.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = config.http_client()?;
        Ok(Self { client, config, model: DEFAULT_COMPLETION_MODEL.into() })
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl CompletionProvider for OpenAICompletionProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        debug!(
            provider = PROVIDER,
            model = %self.model,
            message_count = request.messages.len(),
            temperature = request.temperature,
            "requesting chat completion"
        );

        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(self.config.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                RagError::completion(PROVIDER, describe_request_error(&e, self.config.timeout))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(provider = PROVIDER, %status, "API error");
            return Err(RagError::completion(PROVIDER, format!("API returned {status}: {detail}")));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            RagError::completion(PROVIDER, format!("failed to parse response: {e}"))
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| RagError::completion(PROVIDER, "response contained no message content"))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
