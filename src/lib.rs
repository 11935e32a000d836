//! docqa - Retrieval-augmented question answering over PDFs
//!
//! Uploaded PDFs are extracted, chunked and embedded into a named
//! vector index that is persisted to disk. Questions are embedded the
//! same way, the nearest chunks are retrieved, and an answer model
//! responds from that context alone.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - indexer (PDF extraction, chunking, ingest pipeline)
//!   - providers (embedding and answer model clients, retries)
//!   - storage (vector index, on-disk format, named index store)
//!   - search (retrieval, prompt construction)
//!   - session (chat history), services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Key Features
//!
//! - UTF-8 safe chunking (character-based, never panics)
//! - Skip-and-continue PDF extraction per page
//! - Checksummed, atomically replaced index files
//! - Ingest is all-or-nothing: a failed run leaves the old index intact

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{DocQaError, Result};
pub use core::services::Services;
pub use core::session::ChatSession;
pub use core::storage::{IndexMetadata, IndexStore, Metric, VectorIndex};
pub use core::types::*;
