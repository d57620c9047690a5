//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers (OpenAI and compatible endpoints)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate embeddings for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the default model for this provider
    fn default_model(&self) -> &'static str;

    /// Get the embedding dimensions for a model, when known up front
    fn dimensions(&self, model: &str) -> Option<usize>;
}

#[cfg(test)]
pub mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::domain::embedding::{Embedding, EmbeddingUsage};

    /// Deterministic bag-of-words embedder.
    ///
    /// Each lowercase word is hashed into one of `dimensions` buckets, so texts
    /// sharing vocabulary end up close under cosine similarity.
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        name: &'static str,
        dimensions: usize,
        error: Option<String>,
        delay: Option<Duration>,
        drop_last: bool,
        ragged: bool,
        calls: AtomicUsize,
    }

    impl MockEmbeddingProvider {
        pub fn new(name: &'static str, dimensions: usize) -> Self {
            Self {
                name,
                dimensions,
                error: None,
                delay: None,
                drop_last: false,
                ragged: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Return one vector fewer than requested
        pub fn with_missing_vector(mut self) -> Self {
            self.drop_last = true;
            self
        }

        /// Give every vector after the first an extra dimension
        pub fn with_ragged_dimensions(mut self) -> Self {
            self.ragged = true;
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn vectorize(&self, text: &str) -> Vec<f32> {
            let mut vector = vec![0.0; self.dimensions];

            for word in text
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| !w.is_empty())
            {
                let hash = word
                    .to_lowercase()
                    .bytes()
                    .fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
                        (acc ^ b as u64).wrapping_mul(0x0100_0000_01b3)
                    });
                vector[(hash % self.dimensions as u64) as usize] += 1.0;
            }

            vector
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            let inputs = request.inputs();
            let mut embeddings: Vec<Embedding> = inputs
                .iter()
                .enumerate()
                .map(|(idx, text)| {
                    let mut vector = self.vectorize(text);
                    if self.ragged && idx > 0 {
                        vector.push(0.0);
                    }
                    Embedding::new(idx, vector)
                })
                .collect();

            if self.drop_last {
                embeddings.pop();
            }

            let total_tokens = inputs.iter().map(|t| t.len() / 4).sum::<usize>() as u32;

            Ok(EmbeddingResponse::new(
                request.model().to_string(),
                embeddings,
                EmbeddingUsage::new(total_tokens, total_tokens),
            ))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }

        fn default_model(&self) -> &'static str {
            "mock-embedding"
        }

        fn dimensions(&self, _model: &str) -> Option<usize> {
            Some(self.dimensions)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::embedding::cosine_similarity;

        #[tokio::test]
        async fn test_mock_provider_batch_input() {
            let provider = MockEmbeddingProvider::new("test", 64);
            let request =
                EmbeddingRequest::batch("mock-embedding", vec!["Hello".into(), "World".into()]);

            let response = provider.embed(request).await.unwrap();

            assert_eq!(response.embeddings().len(), 2);
            assert_eq!(response.embeddings()[1].vector().len(), 64);
            assert_eq!(provider.call_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_provider_error() {
            let provider = MockEmbeddingProvider::new("test", 64).with_error("API error");
            let result = provider
                .embed(EmbeddingRequest::single("mock-embedding", "Hello"))
                .await;

            assert!(matches!(result, Err(DomainError::Provider { .. })));
        }

        #[test]
        fn test_shared_vocabulary_is_closer() {
            let provider = MockEmbeddingProvider::new("test", 256);
            let query = provider.vectorize("What is agentic AI?");
            let related = provider.vectorize("Agentic AI systems can plan and act autonomously.");
            let unrelated = provider.vectorize("Bananas grow in tropical climates.");

            assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
        }

        #[test]
        fn test_vectorize_is_case_insensitive() {
            let provider = MockEmbeddingProvider::new("test", 32);
            assert_eq!(provider.vectorize("Agentic"), provider.vectorize("agentic"));
        }
    }
}
