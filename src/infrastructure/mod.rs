//! Infrastructure layer - External service implementations

pub mod agent;
pub mod embedding;
pub mod ingestion;
pub mod judge;
pub mod llm;
pub mod logging;
pub mod retry;
pub mod services;
pub mod timeout;
