//! Data types for passages, search results, and answers.

use serde::{Deserialize, Serialize};

/// A contiguous span of the uploaded document.
///
/// `start` and `end` are character offsets (Unicode scalar values, not bytes)
/// into the source text, with `start < end`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Passage {
    /// Position of the passage in document order.
    pub index: usize,
    /// Character offset of the first character, inclusive.
    pub start: usize,
    /// Character offset one past the last character.
    pub end: usize,
    /// The passage text.
    pub text: String,
}

impl Passage {
    /// Number of characters covered by this passage.
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }
}

/// A retrieved [`Passage`] paired with its distance to the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// The retrieved passage.
    pub passage: Passage,
    /// Squared Euclidean distance to the query embedding (lower is closer).
    pub distance: f32,
}

/// A generated answer together with the passages it was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    /// The generated answer text.
    pub text: String,
    /// The passages sent as context, closest first.
    pub sources: Vec<Passage>,
}
