use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{SimilarityMetric, VectorIndex};
use crate::domain::DomainError;

/// Session-scoped holder of the current index.
///
/// Readers take a cheap `Arc` snapshot; a rebuild swaps in a whole new index,
/// so a query never sees chunks from two builds.
#[derive(Debug)]
pub struct IndexHandle {
    metric: SimilarityMetric,
    current: RwLock<Arc<VectorIndex>>,
}

impl IndexHandle {
    /// Start with an empty index for `model`
    pub fn new(model: impl Into<String>, metric: SimilarityMetric) -> Self {
        Self {
            metric,
            current: RwLock::new(Arc::new(VectorIndex::empty(model, metric))),
        }
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    pub async fn current(&self) -> Arc<VectorIndex> {
        self.current.read().await.clone()
    }

    /// Swap in a freshly built index; the metric is fixed for the session
    pub async fn replace(&self, index: VectorIndex) -> Result<Arc<VectorIndex>, DomainError> {
        if index.metric() != self.metric {
            return Err(DomainError::validation(format!(
                "index built with {} metric, session uses {}",
                index.metric().as_str(),
                self.metric.as_str()
            )));
        }

        let index = Arc::new(index);
        let mut current = self.current.write().await;
        debug!(previous = current.len(), next = index.len(), "Replacing index");
        *current = index.clone();

        Ok(index)
    }
}
