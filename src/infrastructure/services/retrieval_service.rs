//! Query-time retrieval over a vector index

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::indexing_service::as_embedding_error;
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::index::{IndexHandle, ScoredChunk, VectorIndex};
use crate::domain::retrieval::{ContextRetriever, CONTEXT_SEPARATOR};
use crate::domain::DomainError;
use crate::infrastructure::timeout::bounded;

/// Embeds queries and looks up the nearest chunks
#[derive(Debug)]
pub struct RetrievalService {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
    timeout: Duration,
}

impl RetrievalService {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            timeout,
        }
    }

    /// Top `k` chunks for `query`, most similar first
    #[instrument(skip(self, index, query), fields(entries = index.len()))]
    pub async fn search(
        &self,
        index: &VectorIndex,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError> {
        if index.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        if index.model() != self.model {
            return Err(DomainError::validation(format!(
                "index was built with '{}' but queries use '{}'",
                index.model(),
                self.model
            )));
        }

        let request = EmbeddingRequest::single(&self.model, query);
        let response = bounded("embed query", self.timeout, self.provider.embed(request))
            .await
            .map_err(as_embedding_error)?;

        let vector = response
            .into_ordered_vectors()
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::embedding("no vector returned for query"))?;

        let hits = index.search(&vector, k)?;

        debug!(
            hits = hits.len(),
            best = hits.first().map(|h| h.score).unwrap_or(0.0),
            "Retrieved chunks"
        );

        Ok(hits)
    }

    /// Retrieved chunk texts joined into one context string
    pub async fn retrieve(
        &self,
        index: &VectorIndex,
        query: &str,
        k: usize,
    ) -> Result<String, DomainError> {
        let hits = self.search(index, query, k).await?;

        Ok(hits
            .iter()
            .map(|hit| hit.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR))
    }
}

/// Retriever bound to whatever index a session currently holds
#[derive(Debug, Clone)]
pub struct IndexedRetriever {
    service: Arc<RetrievalService>,
    handle: Arc<IndexHandle>,
    top_k: usize,
}

impl IndexedRetriever {
    pub fn new(service: Arc<RetrievalService>, handle: Arc<IndexHandle>, top_k: usize) -> Self {
        Self {
            service,
            handle,
            top_k,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

#[async_trait]
impl ContextRetriever for IndexedRetriever {
    async fn retrieve(&self, query: &str) -> Result<String, DomainError> {
        let index = self.handle.current().await;
        self.service.retrieve(&index, query, self.top_k).await
    }
}
