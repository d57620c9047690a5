//! Document ingestion domain types and traits
//!
//! This module provides:
//! - `DocumentLoader` trait turning uploaded bytes into plain text
//! - `ChunkingStrategy` trait for splitting that text into overlapping chunks

pub mod chunker;
pub mod loader;

pub use chunker::{reassemble, Chunk, ChunkingConfig, ChunkingStrategy};
pub use loader::{DocumentInput, DocumentKind, DocumentLoader, LoadedDocument};
