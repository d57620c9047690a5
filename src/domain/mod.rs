//! Domain layer - Core types, traits, and invariants of the RAG pipeline

pub mod agent;
pub mod embedding;
pub mod error;
pub mod evaluation;
pub mod index;
pub mod ingestion;
pub mod llm;
pub mod retrieval;

pub use agent::{AgentAnswer, AgentMode, AgentState, AnsweringAgent, ConversationMemory};
pub use embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use evaluation::{
    EvaluationReport, EvaluationRun, Judge, JudgeDimension, JudgeInputs, JudgeScores, ScoreBand,
};
pub use index::{IndexHandle, ScoredChunk, SimilarityMetric, VectorIndex};
pub use ingestion::{
    Chunk, ChunkingConfig, ChunkingStrategy, DocumentInput, DocumentKind, DocumentLoader,
    LoadedDocument,
};
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage};
pub use retrieval::ContextRetriever;
