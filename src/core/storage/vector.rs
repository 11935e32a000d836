//! In-memory flat vector index.
//!
//! Stores one embedding per chunk alongside the chunk text and
//! answers exact k-nearest-neighbour queries by scanning every
//! entry. An index is immutable once built and can be searched
//! from many tasks at once.

use crate::core::error::{DocQaError, Result};
use crate::core::types::ScoredChunk;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Similarity metric stored with an index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Euclidean distance, scored as `1 / (1 + d²)`
    #[default]
    L2,
    /// Cosine similarity in `[-1, 1]`
    Cosine,
}

impl Metric {
    /// Score a stored vector against a query (higher = more similar)
    pub fn score(&self, query: &[f32], vector: &[f32]) -> f32 {
        self.score_from_key(self.rank_key(query, vector))
    }

    /// Ordering key used by search (higher = closer)
    ///
    /// For L2 this is the negated squared distance, which keeps
    /// near-identical vectors apart where the score would round to 1.
    fn rank_key(&self, query: &[f32], vector: &[f32]) -> f32 {
        match self {
            Metric::L2 => -squared_distance(query, vector),
            Metric::Cosine => {
                let mut dot = 0.0f32;
                let mut norm_q = 0.0f32;
                let mut norm_v = 0.0f32;
                for (a, b) in query.iter().zip(vector) {
                    dot += a * b;
                    norm_q += a * a;
                    norm_v += b * b;
                }
                if norm_q == 0.0 || norm_v == 0.0 {
                    return 0.0;
                }
                dot / (norm_q.sqrt() * norm_v.sqrt())
            }
        }
    }

    fn score_from_key(&self, key: f32) -> f32 {
        match self {
            Metric::L2 => 1.0 / (1.0 - key),
            Metric::Cosine => key,
        }
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::L2 => write!(f, "l2"),
            Metric::Cosine => write!(f, "cosine"),
        }
    }
}

impl FromStr for Metric {
    type Err = DocQaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l2" => Ok(Metric::L2),
            "cosine" => Ok(Metric::Cosine),
            other => Err(DocQaError::ConfigError(format!(
                "Unknown metric '{other}' (expected 'l2' or 'cosine')"
            ))),
        }
    }
}

/// One stored chunk and its embedding
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub text: String,
    pub vector: Vec<f32>,
}

/// Flat exact-search vector index
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    metric: Metric,
    dimension: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Build an index from chunk texts and their embeddings
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when there is nothing to index, when
    /// the number of texts and vectors differ, or when the vectors
    /// do not all share one non-zero dimension.
    pub fn build(metric: Metric, texts: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if texts.len() != vectors.len() {
            return Err(DocQaError::InvalidInput(format!(
                "Got {} chunks but {} vectors",
                texts.len(),
                vectors.len()
            )));
        }

        let dimension = match vectors.first() {
            Some(v) if !v.is_empty() => v.len(),
            Some(_) => {
                return Err(DocQaError::InvalidInput(
                    "Embedding vectors must not be empty".to_string(),
                ))
            }
            None => {
                return Err(DocQaError::InvalidInput(
                    "Cannot build an index with no entries".to_string(),
                ))
            }
        };

        if let Some((i, v)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimension)
        {
            return Err(DocQaError::InvalidInput(format!(
                "Vector {i} has dimension {} (expected {dimension})",
                v.len()
            )));
        }

        let entries = texts
            .into_iter()
            .zip(vectors)
            .map(|(text, vector)| IndexEntry { text, vector })
            .collect();

        Ok(Self {
            metric,
            dimension,
            entries,
        })
    }

    /// Rebuild an index from decoded parts without re-validating
    pub(crate) fn from_parts(metric: Metric, dimension: usize, entries: Vec<IndexEntry>) -> Self {
        Self {
            metric,
            dimension,
            entries,
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Return the `k` entries most similar to `query`, best first
    ///
    /// L2 hits are ranked by squared distance and cosine hits by
    /// similarity; the reported score is derived afterwards. Equal
    /// keys keep insertion order. `k` larger than the index returns
    /// every entry.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if query.len() != self.dimension {
            return Err(DocQaError::InvalidInput(format!(
                "Query vector has dimension {} but the index stores {}",
                query.len(),
                self.dimension
            )));
        }

        let mut ranked: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let key = self.metric.rank_key(query, &e.vector);
                (i, if key.is_nan() { f32::NEG_INFINITY } else { key })
            })
            .collect();

        // sort_by is stable, so ties stay in insertion order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);

        Ok(ranked
            .into_iter()
            .map(|(position, key)| ScoredChunk {
                text: self.entries[position].text.clone(),
                score: self.metric.score_from_key(key),
                position,
            })
            .collect())
    }
}
