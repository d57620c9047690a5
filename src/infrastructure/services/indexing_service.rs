//! Builds vector indexes from document chunks

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::config::EmbeddingConfig;
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::index::{IndexHandle, SimilarityMetric, VectorIndex};
use crate::domain::ingestion::Chunk;
use crate::domain::DomainError;
use crate::infrastructure::timeout::bounded;

/// Any failure while embedding aborts the build as an embedding error
pub(crate) fn as_embedding_error(error: DomainError) -> DomainError {
    error.into_embedding()
}

/// Embeds chunks in batches and assembles an immutable index
#[derive(Debug)]
pub struct IndexingService {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
    metric: SimilarityMetric,
    batch_size: usize,
    timeout: Duration,
}

impl IndexingService {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        config: &EmbeddingConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            metric: config.metric,
            batch_size: config.batch_size.max(1),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    /// Embed every chunk; either all succeed or no index is produced
    #[instrument(skip(self, chunks), fields(chunks = chunks.len(), model = %self.model))]
    pub async fn build(&self, chunks: Vec<Chunk>) -> Result<VectorIndex, DomainError> {
        if chunks.is_empty() {
            debug!("No chunks to embed, building empty index");
            return Ok(VectorIndex::empty(&self.model, self.metric));
        }

        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());

        for (batch_no, batch) in chunks.chunks(self.batch_size).enumerate() {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let request = EmbeddingRequest::batch(&self.model, texts);

            let response = bounded("embed chunks", self.timeout, self.provider.embed(request))
                .await
                .map_err(|e| {
                    warn!(batch = batch_no, error = %e, "Embedding batch failed");
                    as_embedding_error(e)
                })?;

            let batch_vectors = response.into_ordered_vectors();

            if batch_vectors.len() != batch.len() {
                return Err(DomainError::embedding(format!(
                    "batch {} expected {} vectors, got {}",
                    batch_no,
                    batch.len(),
                    batch_vectors.len()
                )));
            }

            vectors.extend(batch_vectors);
        }

        let index = VectorIndex::from_parts(&self.model, self.metric, chunks, vectors)?;

        info!(
            entries = index.len(),
            dimensions = index.dimensions().unwrap_or(0),
            metric = self.metric.as_str(),
            "Built vector index"
        );

        Ok(index)
    }

    /// Build a new index and swap it into `handle`; on failure the old index stays
    pub async fn rebuild(
        &self,
        handle: &IndexHandle,
        chunks: Vec<Chunk>,
    ) -> Result<Arc<VectorIndex>, DomainError> {
        let index = self.build(chunks).await?;
        handle.replace(index).await
    }
}
