//! Document ingestion module.
//!
//! Turns uploaded PDFs into an in-memory vector index:
//!
//! - PDF text extraction (skip-and-continue per page)
//! - UTF-8 safe character-based chunking with overlap
//! - Pipeline orchestration through the embedding step
//!
//! # Safety
//!
//! The chunker uses character-based slicing via `char_indices()`
//! so it never splits a multi-byte character.

pub mod chunker;
pub mod extractor;
pub mod pipeline;

pub use chunker::Chunker;
pub use extractor::{ExtractedText, PdfExtractor};
pub use pipeline::{IngestPipeline, NO_DOCUMENTS_MESSAGE};
