//! On-disk encoding of a vector index.
//!
//! # File layout
//!
//! ```text
//! {"format":"docqa-index","version":1,"metric":"l2","dimension":768,"count":42,"checksum":"<blake3 hex>"}\n
//! ["chunk text 0","chunk text 1",...]\n
//! <count * dimension little-endian f32 values>
//! ```
//!
//! The header is one line of JSON. Everything after it is the body,
//! and the header's checksum is the blake3 hash of the body. Vectors
//! are stored as raw bits so a reload searches exactly like the index
//! that was saved.

use crate::core::error::{DocQaError, Result};
use crate::core::storage::vector::{IndexEntry, Metric, VectorIndex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Format identifier written to every index file
pub const FORMAT_NAME: &str = "docqa-index";

/// Current index file format version
pub const FORMAT_VERSION: u32 = 1;

/// Index file header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHeader {
    pub format: String,
    pub version: u32,
    pub metric: Metric,
    pub dimension: usize,
    pub count: usize,
    pub checksum: String,
}

/// Serialize an index to bytes
pub fn encode(index: &VectorIndex) -> Result<Vec<u8>> {
    let texts: Vec<&str> = index.entries().iter().map(|e| e.text.as_str()).collect();

    let mut body = serde_json::to_vec(&texts)?;
    body.push(b'\n');
    body.reserve(index.len() * index.dimension() * 4);
    for entry in index.entries() {
        for value in &entry.vector {
            body.extend_from_slice(&value.to_le_bytes());
        }
    }

    let header = IndexHeader {
        format: FORMAT_NAME.to_string(),
        version: FORMAT_VERSION,
        metric: index.metric(),
        dimension: index.dimension(),
        count: index.len(),
        checksum: blake3::hash(&body).to_hex().to_string(),
    };

    let mut bytes = serde_json::to_vec(&header)?;
    bytes.push(b'\n');
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Deserialize and verify an index
///
/// Every failure is reported as `IndexCorrupt`.
pub fn decode(bytes: &[u8]) -> Result<VectorIndex> {
    let (header_bytes, body) = split_line(bytes)
        .ok_or_else(|| DocQaError::IndexCorrupt("missing index header".to_string()))?;

    let header: IndexHeader = serde_json::from_slice(header_bytes)
        .map_err(|e| DocQaError::IndexCorrupt(format!("unreadable header: {e}")))?;

    if header.format != FORMAT_NAME {
        return Err(DocQaError::IndexCorrupt(format!(
            "unknown format '{}'",
            header.format
        )));
    }
    if header.version != FORMAT_VERSION {
        return Err(DocQaError::IndexCorrupt(format!(
            "unsupported format version {} (expected {FORMAT_VERSION})",
            header.version
        )));
    }

    let actual = blake3::hash(body).to_hex().to_string();
    if actual != header.checksum {
        return Err(DocQaError::IndexCorrupt("checksum mismatch".to_string()));
    }

    let (texts_bytes, vector_bytes) = split_line(body)
        .ok_or_else(|| DocQaError::IndexCorrupt("missing chunk texts".to_string()))?;

    let texts: Vec<String> = serde_json::from_slice(texts_bytes)
        .map_err(|e| DocQaError::IndexCorrupt(format!("unreadable chunk texts: {e}")))?;

    if texts.len() != header.count {
        return Err(DocQaError::IndexCorrupt(format!(
            "header declares {} entries but {} texts are stored",
            header.count,
            texts.len()
        )));
    }
    if header.count > 0 && header.dimension == 0 {
        return Err(DocQaError::IndexCorrupt("zero dimension".to_string()));
    }

    let expected_len = header
        .count
        .checked_mul(header.dimension)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| DocQaError::IndexCorrupt("entry count overflows".to_string()))?;
    if vector_bytes.len() != expected_len {
        return Err(DocQaError::IndexCorrupt(format!(
            "expected {expected_len} bytes of vectors, found {}",
            vector_bytes.len()
        )));
    }

    let values: Vec<f32> = vector_bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    let entries = if header.dimension == 0 {
        Vec::new()
    } else {
        texts
            .into_iter()
            .zip(values.chunks_exact(header.dimension))
            .map(|(text, vector)| IndexEntry {
                text,
                vector: vector.to_vec(),
            })
            .collect()
    };

    Ok(VectorIndex::from_parts(
        header.metric,
        header.dimension,
        entries,
    ))
}

/// Read only the header of an index file
pub fn read_header(path: &Path) -> Result<IndexHeader> {
    let bytes = read_bytes(path)?;
    let (header_bytes, _) = split_line(&bytes)
        .ok_or_else(|| DocQaError::IndexCorrupt("missing index header".to_string()))?;
    serde_json::from_slice(header_bytes)
        .map_err(|e| DocQaError::IndexCorrupt(format!("unreadable header: {e}")))
}

/// Load and verify an index file
pub fn read(path: &Path) -> Result<VectorIndex> {
    let bytes = read_bytes(path)?;
    decode(&bytes)
}

/// Write an index file atomically
///
/// The bytes go to a temporary file in the destination directory,
/// are synced, and then renamed over `path`. Readers see either the
/// previous file or the new one, never a partial write.
pub fn write_atomic(path: &Path, index: &VectorIndex) -> Result<()> {
    let bytes = encode(index)?;
    write_bytes_atomic(path, &bytes)
}

/// Atomically replace `path` with `bytes`
pub(crate) fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| DocQaError::StorageError(format!("{path:?} has no parent directory")))?;
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| DocQaError::StorageError(format!("Failed to replace {path:?}: {e}")))?;

    Ok(())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DocQaError::IndexNotFound(path.display().to_string()),
        _ => DocQaError::IndexCorrupt(format!("unreadable index file {path:?}: {e}")),
    })
}

fn split_line(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = bytes.iter().position(|&b| b == b'\n')?;
    Some((&bytes[..pos], &bytes[pos + 1..]))
}
