//! Environment-driven configuration.
//!
//! Values come from the process environment, after loading a `.env` file if
//! one exists. Parsing goes through a lookup function so tests can supply
//! their own variables.

use std::str::FromStr;

use anyhow::{Context, bail};
use docqa_rag::RagConfig;
use docqa_rag::openai::{DEFAULT_BASE_URL, OpenAIConfig};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Everything the front-end needs to build a session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Connection settings for the embedding and completion services.
    pub openai: OpenAIConfig,
    /// Chunking, retrieval and generation parameters.
    pub rag: RagConfig,
    /// Log output format.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load `.env` (if present) and read configuration from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("OPENAI_API_KEY must be set (in the environment or a .env file)")?;

        let defaults = RagConfig::default();
        let rag = RagConfig::builder()
            .chunk_size(parse_or(&lookup, "DOCQA_CHUNK_SIZE", defaults.chunk_size)?)
            .chunk_overlap(parse_or(&lookup, "DOCQA_CHUNK_OVERLAP", defaults.chunk_overlap)?)
            .top_k(parse_or(&lookup, "DOCQA_TOP_K", defaults.top_k)?)
            .embedding_model(lookup("DOCQA_EMBEDDING_MODEL").unwrap_or(defaults.embedding_model))
            .completion_model(
                lookup("DOCQA_COMPLETION_MODEL").unwrap_or(defaults.completion_model),
            )
            .temperature(parse_or(&lookup, "DOCQA_TEMPERATURE", defaults.temperature)?)
            .embedding_concurrency(parse_or(
                &lookup,
                "DOCQA_EMBEDDING_CONCURRENCY",
                defaults.embedding_concurrency,
            )?)
            .request_timeout_secs(parse_or(
                &lookup,
                "DOCQA_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?)
            .build()?;

        let openai = OpenAIConfig::new(api_key)
            .with_base_url(lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()))
            .with_timeout(rag.request_timeout());

        let log_format = match lookup("DOCQA_LOG_FORMAT").as_deref() {
            None | Some("pretty") | Some("") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => bail!("DOCQA_LOG_FORMAT must be 'pretty' or 'json', got '{other}'"),
        };

        Ok(Self { openai, rag, log_format })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("invalid value for {key}: '{raw}'")),
        None => Ok(default),
    }
}
