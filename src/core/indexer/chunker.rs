//! UTF-8 safe sliding-window text chunking.
//!
//! Windows are measured in characters (Unicode scalar values),
//! never bytes. Boundaries come from `char_indices()`, so a chunk
//! can never split a multi-byte sequence.
//!
//! # Example
//!
//! ```
//! use docqa::core::indexer::Chunker;
//!
//! let chunker = Chunker::new(10_000, 1_000).unwrap();
//! let text = "A".repeat(25_000);
//! let lengths: Vec<usize> = chunker
//!     .chunk_text(&text)
//!     .iter()
//!     .map(|c| c.text.chars().count())
//!     .collect();
//!
//! assert_eq!(lengths, vec![10_000, 10_000, 7_000]);
//! ```

use crate::core::error::{DocQaError, Result};
use crate::core::types::Chunk;

/// UTF-8 safe text chunker.
///
/// Splits text into windows of `chunk_size` characters, each
/// sharing `overlap` characters with its predecessor. The final
/// window may be shorter.
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Number of characters per chunk
    chunk_size: usize,

    /// Number of characters to overlap between consecutive chunks
    overlap: usize,
}

impl Chunker {
    /// Create a new chunker with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `chunk_size` is 0 or if
    /// `overlap >= chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DocQaError::ConfigError(
                "Chunk size must be non-zero".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(DocQaError::ConfigError(format!(
                "Overlap ({overlap}) must be less than chunk size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Get the chunk size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Get the overlap size in characters.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Chunk text into overlapping segments.
    ///
    /// Empty text yields no chunks. Text of at most `chunk_size`
    /// characters yields exactly one. Otherwise the window advances
    /// by `chunk_size - overlap` until a window reaches the end of
    /// the text, giving `ceil((L - O) / (C - O))` chunks.
    pub fn chunk_text(&self, text: &str) -> Vec<Chunk> {
        // (byte offset, char) pairs; all slicing goes through these
        let char_indices: Vec<(usize, char)> = text.char_indices().collect();

        if char_indices.is_empty() {
            return Vec::new();
        }

        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut char_start_idx = 0;

        loop {
            let char_end_idx = (char_start_idx + self.chunk_size).min(char_indices.len());

            let byte_start = char_indices[char_start_idx].0;
            let byte_end = if char_end_idx < char_indices.len() {
                char_indices[char_end_idx].0
            } else {
                text.len()
            };

            chunks.push(Chunk {
                text: text[byte_start..byte_end].to_string(),
                start_offset: byte_start,
                end_offset: byte_end,
                chunk_index: chunks.len(),
            });

            // A window that reached the end covers everything left
            if char_end_idx == char_indices.len() {
                break;
            }
            char_start_idx += step;
        }

        chunks
    }
}
