//! Core data types for the docqa pipeline.
//!
//! This module defines the data structures that flow between the
//! ingest and query stages: uploaded documents, chunks, scored
//! retrieval results, answers and statistics.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// An uploaded document awaiting ingestion
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Display name (usually the file name)
    pub name: String,

    /// Raw document bytes
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Create a document from a name and its raw bytes
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a document from disk
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// A single text chunk cut from the extracted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The actual text content
    pub text: String,

    /// Byte offset where chunk starts in the extracted text
    pub start_offset: usize,

    /// Byte offset where chunk ends in the extracted text
    pub end_offset: usize,

    /// Sequential chunk number
    pub chunk_index: usize,
}

/// A chunk returned by a similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Chunk text content
    pub text: String,

    /// Similarity score (higher = more similar)
    pub score: f32,

    /// Insertion position of the chunk in the index
    pub position: usize,
}

/// Statistics from an ingest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestStats {
    /// Index name the run was persisted under
    pub index: String,

    /// Documents received
    pub documents: usize,

    /// Documents that could not be opened at all
    pub documents_skipped: usize,

    /// Pages visited across all documents
    pub pages: usize,

    /// Pages whose text could not be extracted
    pub pages_skipped: usize,

    /// Characters of extracted text
    pub characters: usize,

    /// Total chunks created
    pub chunks_created: usize,

    /// Embedding dimensionality
    pub dimension: usize,

    /// Ingest duration in milliseconds
    pub duration_ms: u64,
}

/// A synthesized answer together with the context it was built from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The question as asked
    pub question: String,

    /// Synthesizer output, verbatim
    pub answer: String,

    /// Index the context was retrieved from
    pub index: String,

    /// Retrieved chunks, most similar first
    pub context: Vec<ScoredChunk>,

    /// End-to-end duration in milliseconds
    pub duration_ms: u64,
}
