//! Application services composing domain types with providers

mod evaluation_service;
mod indexing_service;
mod retrieval_service;

pub use evaluation_service::EvaluationService;
pub use indexing_service::IndexingService;
pub use retrieval_service::{IndexedRetriever, RetrievalService};
