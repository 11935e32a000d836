//! Core domain logic
//!
//! Everything the CLI drives lives here, independent of how it is
//! invoked.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **indexer**: PDF extraction, chunking, ingest pipeline
//! - **providers**: Embedding and answer model clients
//! - **storage**: Vector index, on-disk format, named index store
//! - **search**: Retrieval and prompt construction
//! - **session**: Per-chat history
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod indexer;
pub mod providers;
pub mod search;
pub mod services;
pub mod session;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{DocQaError, Result};
pub use services::Services;
pub use session::ChatSession;
