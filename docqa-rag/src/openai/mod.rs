//! OpenAI-compatible embedding and completion providers.
//!
//! Both providers call the HTTP API directly through `reqwest` and take their
//! credentials from an explicit [`OpenAIConfig`].
//!
//! This module is only available when the `openai` feature is enabled.

mod completion;
mod embedding;

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{RagError, Result};

pub use completion::OpenAICompletionProvider;
pub use embedding::OpenAIEmbeddingProvider;

/// The default OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings shared by the OpenAI providers.
#[derive(Clone)]
pub struct OpenAIConfig {
    /// Bearer token sent with every request.
    pub api_key: String,
    /// API base URL without a trailing slash, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Timeout applied to each HTTP request.
    pub timeout: Duration,
}

impl fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAIConfig {
    /// Settings for the public OpenAI API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point at an OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    /// Build an HTTP client for these settings.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        if self.api_key.trim().is_empty() {
            return Err(RagError::InvalidConfiguration("API key must not be empty".to_string()));
        }
        reqwest::Client::builder().timeout(self.timeout).build().map_err(|e| {
            RagError::InvalidConfiguration(format!("failed to build HTTP client: {e}"))
        })
    }
}

// ── OpenAI API error envelope ──────────────────────────────────────

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extract the `error.message` field from an error body, or fall back to the raw body.
pub(crate) fn error_detail(body: String) -> String {
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body)
}

/// Describe a transport failure, calling out timeouts.
pub(crate) fn describe_request_error(e: &reqwest::Error, timeout: Duration) -> String {
    if e.is_timeout() {
        format!("request timed out after {}s", timeout.as_secs_f32())
    } else {
        format!("request failed: {e}")
    }
}
