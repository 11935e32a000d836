//! Storage layer for persisted vector indexes.
//!
//! # Architecture
//!
//! - **VectorIndex**: In-memory flat index with exact search
//! - **codec**: Checksummed on-disk format with atomic writes
//! - **IndexStore**: Named index directories and metadata
//! - **IndexValidator**: Integrity reports
//!
//! # Storage Structure
//!
//! ```text
//! {index_dir}/
//! ├── {index-name}/
//! │   ├── vectors.idx         # Vector index
//! │   └── meta.json           # Index metadata
//! ```

pub mod codec;
mod store;
mod validator;
mod vector;

pub use store::{IndexMetadata, IndexStore, INDEX_FILE, SCHEMA_VERSION};
pub use validator::{IndexValidator, ValidationReport};
pub use vector::{IndexEntry, Metric, VectorIndex};
