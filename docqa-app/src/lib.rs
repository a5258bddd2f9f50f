//! `docqa` answers questions about one plain-text document.
//!
//! The document is chunked, embedded and indexed once; every question is then
//! answered against that index through the configured completion model.

pub mod config;
pub mod telemetry;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use docqa_rag::openai::{OpenAICompletionProvider, OpenAIEmbeddingProvider};
use docqa_rag::{Answer, AnswerComposer, Retriever, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

pub use config::{AppConfig, LogFormat};

/// Ask questions about a plain-text document.
#[derive(Debug, Parser)]
#[command(name = "docqa", version, about)]
pub struct Cli {
    /// The `.txt` document to index.
    pub document: PathBuf,

    /// Questions to answer. Read one per line from stdin when omitted.
    pub questions: Vec<String>,
}

/// Read a `.txt` file as UTF-8.
pub async fn load_document(path: &Path) -> anyhow::Result<String> {
    let is_txt = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    if !is_txt {
        bail!("only .txt files are supported, got '{}'", path.display());
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    String::from_utf8(bytes).with_context(|| format!("'{}' is not valid UTF-8", path.display()))
}

/// Build a session wired to the OpenAI-compatible services in `config`.
pub fn build_session(config: &AppConfig) -> anyhow::Result<Session> {
    let embedder = OpenAIEmbeddingProvider::new(config.openai.clone())?
        .with_model(config.rag.embedding_model.clone());
    let completion = OpenAICompletionProvider::new(config.openai.clone())?
        .with_model(config.rag.completion_model.clone());

    let retriever = Retriever::builder()
        .config(config.rag.clone())
        .embedding_provider(Arc::new(embedder))
        .build()?;
    let composer =
        AnswerComposer::new(Arc::new(completion)).with_temperature(config.rag.temperature);

    Ok(Session::new(Arc::new(retriever), Arc::new(composer)))
}

/// Print an answer followed by the passages it was grounded on.
pub fn render_answer(out: &mut impl Write, answer: &Answer) -> std::io::Result<()> {
    writeln!(out, "### Answer")?;
    writeln!(out, "{}", answer.text)?;
    writeln!(out)?;
    writeln!(out, "### Source chunks used")?;
    for (i, passage) in answer.sources.iter().enumerate() {
        writeln!(out, "Chunk {}:", i + 1)?;
        writeln!(out, "{}", passage.text)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Answer one question, printing either the answer or the error.
///
/// A failed question does not end the session.
pub async fn answer_question(
    session: &Session,
    question: &str,
    out: &mut impl Write,
) -> std::io::Result<()> {
    match session.ask(question).await {
        Ok(answer) => render_answer(out, &answer),
        Err(e) => writeln!(out, "Error: {e}"),
    }
}

/// Index the document named on the command line and answer every question.
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let text = load_document(&cli.document).await?;
    let mut session = build_session(&config)?;

    let passage_count = session
        .upload(&text)
        .await
        .with_context(|| format!("failed to index '{}'", cli.document.display()))?;
    info!(document = %cli.document.display(), passage_count, "document ready");

    let mut stdout = std::io::stdout();
    if !cli.questions.is_empty() {
        for question in &cli.questions {
            answer_question(&session, question, &mut stdout).await?;
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        answer_question(&session, question, &mut stdout).await?;
        stdout.flush()?;
    }
    Ok(())
}
