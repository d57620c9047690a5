use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::embedding::{cosine_similarity, euclidean_distance};
use crate::domain::ingestion::Chunk;
use crate::domain::DomainError;

/// Similarity metric an index is built and queried with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    #[default]
    Cosine,
    /// L2 distance, reported as `1 / (1 + d)` so higher is better
    Euclidean,
}

impl SimilarityMetric {
    pub fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Cosine => cosine_similarity(a, b),
            Self::Euclidean => 1.0 / (1.0 + euclidean_distance(a, b)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
        }
    }
}

/// A chunk returned from a search, with its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[derive(Debug)]
struct IndexEntry {
    chunk: Chunk,
    vector: Vec<f32>,
}

/// Immutable exact nearest-neighbour index.
///
/// Every stored vector has the same dimension and belongs to exactly one chunk.
#[derive(Debug)]
pub struct VectorIndex {
    model: String,
    metric: SimilarityMetric,
    dimensions: Option<usize>,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn empty(model: impl Into<String>, metric: SimilarityMetric) -> Self {
        Self {
            model: model.into(),
            metric,
            dimensions: None,
            entries: Vec::new(),
        }
    }

    /// Pair chunks with their vectors.
    ///
    /// Count or dimension disagreements mean the provider returned malformed
    /// output, so they are reported as embedding errors.
    pub fn from_parts(
        model: impl Into<String>,
        metric: SimilarityMetric,
        chunks: Vec<Chunk>,
        vectors: Vec<Vec<f32>>,
    ) -> Result<Self, DomainError> {
        if chunks.len() != vectors.len() {
            return Err(DomainError::embedding(format!(
                "expected {} vectors, got {}",
                chunks.len(),
                vectors.len()
            )));
        }

        let dimensions = vectors.first().map(Vec::len);

        if dimensions == Some(0) {
            return Err(DomainError::embedding("provider returned an empty vector"));
        }

        if let Some(dims) = dimensions {
            if let Some(pos) = vectors.iter().position(|v| v.len() != dims) {
                return Err(DomainError::embedding(format!(
                    "vector {} has dimension {}, expected {}",
                    pos,
                    vectors[pos].len(),
                    dims
                )));
            }
        }

        let entries = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| IndexEntry { chunk, vector })
            .collect();

        Ok(Self {
            model: model.into(),
            metric,
            dimensions,
            entries,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    /// Vector dimension, `None` for an empty index
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|e| &e.chunk)
    }

    /// The `k` most similar chunks, best first; ties keep document order
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, DomainError> {
        if let Some(dims) = self.dimensions {
            if query.len() != dims {
                return Err(DomainError::validation(format!(
                    "query vector has dimension {}, index expects {}",
                    query.len(),
                    dims
                )));
            }
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                score: self.metric.score(query, &entry.vector),
                chunk: entry.chunk.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.chunk.sequence_index.cmp(&b.chunk.sequence_index))
        });
        scored.truncate(k);

        Ok(scored)
    }
}
