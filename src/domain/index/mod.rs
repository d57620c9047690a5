//! In-memory vector index over document chunks

mod handle;
mod vector_index;

pub use handle::IndexHandle;
pub use vector_index::{ScoredChunk, SimilarityMetric, VectorIndex};
