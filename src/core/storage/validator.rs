//! Index integrity checks.
//!
//! Verifies that a persisted index file decodes cleanly (checksum
//! included) and that its contents agree with the index metadata.

use crate::core::error::Result;
use crate::core::storage::codec;
use crate::core::storage::store::IndexStore;
use serde::{Deserialize, Serialize};

/// Integrity report for one index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Index validated
    pub index: String,

    /// Metadata values
    pub metadata_chunks: usize,
    pub metadata_dimension: usize,

    /// Values read from the index file (header values when the body
    /// fails verification, 0 when the header is unreadable too)
    pub actual_entries: usize,
    pub actual_dimension: usize,

    /// Validation results
    pub checksum_ok: bool,
    pub entries_match: bool,
    pub dimension_match: bool,
    pub is_consistent: bool,

    /// Decode failure, if any
    pub error: Option<String>,

    /// Validation timestamp
    pub validated_at: String,
}

/// Validator for persisted indexes
pub struct IndexValidator<'a> {
    store: &'a IndexStore,
}

impl<'a> IndexValidator<'a> {
    pub fn new(store: &'a IndexStore) -> Self {
        Self { store }
    }

    /// Validate one index against its metadata
    ///
    /// Fails only when the metadata itself is missing; a corrupt
    /// index file is reported, not returned as an error.
    pub fn validate(&self, name: &str) -> Result<ValidationReport> {
        let metadata = self.store.get_metadata(name)?;

        let path = self.store.index_path(name);
        let (actual_entries, actual_dimension, checksum_ok, error) = match codec::read(&path) {
            Ok(index) => (index.len(), index.dimension(), true, None),
            // Fall back to what the header declares, if it is readable
            Err(e) => match codec::read_header(&path) {
                Ok(header) => (header.count, header.dimension, false, Some(e.to_string())),
                Err(_) => (0, 0, false, Some(e.to_string())),
            },
        };

        let entries_match = checksum_ok && actual_entries == metadata.chunks;
        let dimension_match = checksum_ok && actual_dimension == metadata.dimension;

        Ok(ValidationReport {
            index: name.to_string(),
            metadata_chunks: metadata.chunks,
            metadata_dimension: metadata.dimension,
            actual_entries,
            actual_dimension,
            checksum_ok,
            entries_match,
            dimension_match,
            is_consistent: checksum_ok && entries_match && dimension_match,
            error,
            validated_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Validate every listed index
    pub fn validate_all(&self) -> Result<Vec<ValidationReport>> {
        let mut reports = Vec::new();

        for metadata in self.store.list()? {
            match self.validate(&metadata.name) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::error!("Failed to validate index '{}': {}", metadata.name, e);
                }
            }
        }

        Ok(reports)
    }
}
