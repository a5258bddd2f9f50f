//! Fixed-size document chunking with overlap.
//!
//! Passages are measured in characters so that a boundary never falls inside
//! a multi-byte UTF-8 sequence.

use crate::document::Passage;
use crate::error::{RagError, Result};

/// Splits text into fixed-size passages by character count with overlap.
///
/// Each passage starts `chunk_size - chunk_overlap` characters after its
/// predecessor. The final passage may be shorter than `chunk_size`; it is
/// neither padded nor dropped.
///
/// # Example
///
/// ```rust
/// use docqa_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(20, 5).unwrap();
/// let passages = chunker.chunk("The sky is blue. Grass is green.");
/// assert_eq!(passages.len(), 2);
/// assert_eq!(passages[1].text, ". Grass is green.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size`: maximum number of characters per passage
    /// * `chunk_overlap`: number of characters shared by consecutive passages
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::InvalidConfiguration(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::InvalidConfiguration(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }

    /// Maximum number of characters per passage.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of characters shared by consecutive passages.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into passages in document order.
    ///
    /// Returns an empty `Vec` for empty text.
    pub fn chunk(&self, text: &str) -> Vec<Passage> {
        // Byte offset of every char boundary, including the end of the text.
        let boundaries: Vec<usize> =
            text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
        let char_len = boundaries.len() - 1;

        let step = self.chunk_size - self.chunk_overlap;
        let mut passages = Vec::new();
        let mut start = 0;

        while start < char_len {
            let end = (start + self.chunk_size).min(char_len);
            passages.push(Passage {
                index: passages.len(),
                start,
                end,
                text: text[boundaries[start]..boundaries[end]].to_string(),
            });
            // A window that reaches the end covers the rest, so a text no
            // longer than `chunk_size` stays a single passage.
            if end == char_len {
                break;
            }
            start += step;
        }

        passages
    }
}

/// Split `text` into overlapping passages of at most `max_size` characters.
///
/// Shorthand for [`FixedSizeChunker::new`] followed by [`FixedSizeChunker::chunk`].
///
/// # Errors
///
/// Returns [`RagError::InvalidConfiguration`] if `overlap >= max_size` or
/// `max_size` is zero.
pub fn chunk(text: &str, max_size: usize, overlap: usize) -> Result<Vec<Passage>> {
    Ok(FixedSizeChunker::new(max_size, overlap)?.chunk(text))
}
