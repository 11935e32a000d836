//! Named index storage.
//!
//! Each index lives in its own directory under the storage root and
//! is replaced wholesale every time documents are processed into it.

use crate::core::error::{DocQaError, Result};
use crate::core::storage::codec;
use crate::core::storage::vector::{Metric, VectorIndex};
use crate::core::types::IngestStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Current metadata schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Index file name inside an index directory
pub const INDEX_FILE: &str = "vectors.idx";

const METADATA_FILE: &str = "meta.json";
const MAX_NAME_LEN: usize = 64;

/// Work directories under the root; never valid index names
const STAGING_PREFIX: &str = ".staging-";
const RETIRED_PREFIX: &str = ".retired-";

/// Bound on swap attempts lost to concurrent saves of one name
const MAX_SWAP_ATTEMPTS: usize = 16;

/// Index metadata (meta.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub documents: usize,
    pub pages: usize,
    pub pages_skipped: usize,
    pub chunks: usize,
    pub dimension: usize,
    pub metric: Metric,
    pub chunk_size: usize,
    pub overlap: usize,
    pub embedding_model: String,
    pub index_size_bytes: u64,
    pub schema_version: u32,
}

impl IndexMetadata {
    /// Describe a freshly built index
    pub fn from_ingest(
        stats: &IngestStats,
        index: &VectorIndex,
        chunk_size: usize,
        overlap: usize,
        embedding_model: &str,
    ) -> Self {
        Self {
            name: stats.index.clone(),
            created_at: Utc::now(),
            documents: stats.documents - stats.documents_skipped,
            pages: stats.pages,
            pages_skipped: stats.pages_skipped,
            chunks: index.len(),
            dimension: index.dimension(),
            metric: index.metric(),
            chunk_size,
            overlap,
            embedding_model: embedding_model.to_string(),
            index_size_bytes: 0,
            schema_version: SCHEMA_VERSION,
        }
    }
}

/// Storage for named vector indexes
///
/// ```text
/// {root}/
/// ├── faiss_index/
/// │   ├── vectors.idx     # header + checksummed body
/// │   └── meta.json       # IndexMetadata
/// └── {other-index}/
/// ```
#[derive(Debug, Clone)]
pub struct IndexStore {
    root: PathBuf,
}

impl IndexStore {
    /// Create a store rooted at `root`
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate an index name
    ///
    /// Names are 1 to 64 characters of ASCII letters, digits, `-` or `_`.
    pub fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(DocQaError::InvalidInput(format!(
                "Index name must be 1-{MAX_NAME_LEN} characters"
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DocQaError::InvalidInput(format!(
                "Index name '{name}' may only contain letters, digits, '-' and '_'"
            )));
        }
        Ok(())
    }

    fn index_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn metadata_path(&self, name: &str) -> PathBuf {
        self.index_dir(name).join(METADATA_FILE)
    }

    /// Path of the index file for `name`
    pub fn index_path(&self, name: &str) -> PathBuf {
        self.index_dir(name).join(INDEX_FILE)
    }

    /// Persist an index, replacing any previous index with that name
    ///
    /// The index file and its metadata are written into a staging
    /// directory under the root, which then replaces the index
    /// directory in one rename. Readers see either the old pair or
    /// the new pair. A failure before the rename leaves the previous
    /// index untouched; concurrent saves of one name end with the
    /// last one to land.
    pub fn save(
        &self,
        name: &str,
        index: &VectorIndex,
        mut metadata: IndexMetadata,
    ) -> Result<IndexMetadata> {
        Self::validate_name(name)?;
        fs::create_dir_all(&self.root)?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.root)?;

        let staged_index = staging.path().join(INDEX_FILE);
        codec::write_atomic(&staged_index, index)?;

        metadata.name = name.to_string();
        metadata.chunks = index.len();
        metadata.dimension = index.dimension();
        metadata.metric = index.metric();
        metadata.index_size_bytes = fs::metadata(&staged_index)?.len();
        metadata.schema_version = SCHEMA_VERSION;

        let json = serde_json::to_vec_pretty(&metadata)?;
        codec::write_bytes_atomic(&staging.path().join(METADATA_FILE), &json)?;

        self.swap_in(name, staging.path())?;

        tracing::info!(
            "Saved index '{}' ({} entries, {} bytes)",
            name,
            index.len(),
            metadata.index_size_bytes
        );

        Ok(metadata)
    }

    /// Move a staged directory into place as index `name`
    ///
    /// A directory cannot be renamed over a non-empty one, so the live
    /// directory is first moved aside into a retired directory that is
    /// removed on return. If another save lands between the two
    /// renames, the swap is attempted again.
    fn swap_in(&self, name: &str, staged: &Path) -> Result<()> {
        let live = self.index_dir(name);
        let retired = tempfile::Builder::new()
            .prefix(RETIRED_PREFIX)
            .tempdir_in(&self.root)?;

        for attempt in 0..MAX_SWAP_ATTEMPTS {
            let aside = retired.path().join(attempt.to_string());
            let moved = match fs::rename(&live, &aside) {
                Ok(()) => true,
                Err(e) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => {
                    return Err(DocQaError::StorageError(format!(
                        "Failed to move {live:?} aside: {e}"
                    )))
                }
            };

            match fs::rename(staged, &live) {
                Ok(()) => return Ok(()),
                Err(e) if live.exists() => {
                    tracing::debug!("Concurrent save of '{}' landed first: {}", name, e);
                }
                Err(e) => {
                    if moved {
                        if let Err(restore) = fs::rename(&aside, &live) {
                            tracing::warn!("Failed to restore {:?}: {}", live, restore);
                        }
                    }
                    return Err(DocQaError::StorageError(format!(
                        "Failed to replace {live:?}: {e}"
                    )));
                }
            }
        }

        Err(DocQaError::StorageError(format!(
            "Index '{name}' kept changing during save; gave up after {MAX_SWAP_ATTEMPTS} attempts"
        )))
    }

    /// Load and verify an index
    pub fn load(&self, name: &str) -> Result<VectorIndex> {
        Self::validate_name(name)?;

        codec::read(&self.index_path(name)).map_err(|e| match e {
            DocQaError::IndexNotFound(_) => DocQaError::IndexNotFound(format!(
                "'{name}' (process documents into it first)"
            )),
            other => other,
        })
    }

    /// Check if an index exists
    pub fn exists(&self, name: &str) -> bool {
        Self::validate_name(name).is_ok() && self.index_path(name).exists()
    }

    /// Delete an index and its metadata
    pub fn delete(&self, name: &str) -> Result<()> {
        Self::validate_name(name)?;

        let dir = self.index_dir(name);
        if !dir.exists() {
            return Err(DocQaError::IndexNotFound(name.to_string()));
        }

        fs::remove_dir_all(dir)?;
        tracing::info!("Deleted index '{}'", name);
        Ok(())
    }

    /// Get index metadata
    pub fn get_metadata(&self, name: &str) -> Result<IndexMetadata> {
        Self::validate_name(name)?;

        let meta_path = self.metadata_path(name);
        if !meta_path.exists() {
            return Err(DocQaError::IndexNotFound(name.to_string()));
        }

        let contents = fs::read_to_string(&meta_path)?;
        let metadata: IndexMetadata = serde_json::from_str(&contents)
            .map_err(|e| DocQaError::IndexCorrupt(format!("{name}: unreadable metadata: {e}")))?;

        if metadata.schema_version != SCHEMA_VERSION {
            return Err(DocQaError::IndexCorrupt(format!(
                "Index '{}' uses schema version {} (current: v{}). \
                 Please process the documents again.",
                name, metadata.schema_version, SCHEMA_VERSION
            )));
        }

        Ok(metadata)
    }

    /// List all indexes with readable metadata, sorted by name
    pub fn list(&self) -> Result<Vec<IndexMetadata>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut indexes = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                match self.get_metadata(name) {
                    Ok(metadata) => indexes.push(metadata),
                    Err(e) => tracing::debug!("Skipping {:?}: {}", entry.path(), e),
                }
            }
        }

        indexes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(indexes)
    }

    /// Total size of an index directory on disk
    pub fn disk_usage(&self, name: &str) -> u64 {
        calculate_directory_size(&self.index_dir(name))
    }
}

/// Calculate total size of a directory recursively
fn calculate_directory_size(dir_path: &Path) -> u64 {
    if !dir_path.exists() {
        return 0;
    }

    WalkDir::new(dir_path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}
