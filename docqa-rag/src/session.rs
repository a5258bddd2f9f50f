//! Per-session document state.
//!
//! A [`Session`] owns at most one [`IndexHandle`]. Uploading a document moves
//! it from [`SessionState::Empty`] to [`SessionState::Indexed`]; uploading
//! another document replaces the handle. A failed upload leaves the previous
//! handle in place.

use std::sync::Arc;

use tracing::{info, warn};

use crate::answer::AnswerComposer;
use crate::document::{Answer, Passage};
use crate::error::{RagError, Result};
use crate::retriever::{IndexHandle, Retriever};

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No document has been indexed.
    Empty,
    /// A document is indexed and can be queried.
    Indexed,
}

/// One user's upload-and-ask session.
pub struct Session {
    retriever: Arc<Retriever>,
    composer: Arc<AnswerComposer>,
    handle: Option<IndexHandle>,
}

impl Session {
    /// Start an empty session.
    pub fn new(retriever: Arc<Retriever>, composer: Arc<AnswerComposer>) -> Self {
        Self { retriever, composer, handle: None }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        match self.handle {
            Some(_) => SessionState::Indexed,
            None => SessionState::Empty,
        }
    }

    /// The current handle, if a document has been indexed.
    pub fn handle(&self) -> Option<&IndexHandle> {
        self.handle.as_ref()
    }

    /// Index `text`, replacing any previously uploaded document.
    ///
    /// Returns the number of passages indexed.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Retriever::index_document`]; the session
    /// keeps its previous document in that case.
    pub async fn upload(&mut self, text: &str) -> Result<usize> {
        let handle = self.retriever.index_document(text).await.inspect_err(|e| {
            warn!(error = %e, "upload failed, keeping previous document");
        })?;
        let passage_count = handle.passages().len();
        if self.handle.replace(handle).is_some() {
            info!(passage_count, "replaced indexed document");
        }
        Ok(passage_count)
    }

    /// Retrieve the top-K passages for `question` without generating an answer.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NoPassagesAvailable`] in the `Empty` state, and
    /// otherwise propagates [`Retriever::query`] errors.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<Passage>> {
        let handle = self.handle.as_ref().ok_or(RagError::NoPassagesAvailable)?;
        self.retriever.query(handle, question).await
    }

    /// Answer `question` from the indexed document.
    ///
    /// # Errors
    ///
    /// Any retrieval or completion error; no partial answer is produced.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        if question.trim().is_empty() {
            return Err(RagError::InvalidInput("question must not be empty".to_string()));
        }
        let passages = self.retrieve(question).await?;
        self.composer.compose(question, passages).await
    }

    /// Drop the indexed document and return to the `Empty` state.
    pub fn clear(&mut self) {
        self.handle = None;
    }
}
