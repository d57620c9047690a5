//! Chunking strategy trait and types

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::domain::DomainError;

/// Configuration for chunking.
///
/// Sizes are counted in user-perceived characters (grapheme clusters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.chunk_size == 0 {
            return Err(DomainError::validation("chunk_size must be greater than 0"));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(DomainError::validation(
                "chunk_overlap must be less than chunk_size",
            ));
        }

        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// A contiguous slice of a source document.
///
/// `char_start..char_end` locates the chunk in the source text, so the
/// overlap with the previous chunk is `prev.char_end - char_start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub source_id: String,
    pub sequence_index: usize,
    pub char_start: usize,
    pub char_end: usize,
}

impl Chunk {
    pub fn new(
        text: impl Into<String>,
        source_id: impl Into<String>,
        sequence_index: usize,
        char_start: usize,
        char_end: usize,
    ) -> Self {
        Self {
            text: text.into(),
            source_id: source_id.into(),
            sequence_index,
            char_start,
            char_end,
        }
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.char_end - self.char_start
    }

    pub fn is_empty(&self) -> bool {
        self.char_end == self.char_start
    }
}

/// Trait for chunking strategies
pub trait ChunkingStrategy: Send + Sync + Debug {
    /// Split `text` into ordered chunks attributed to `source_id`
    fn split(
        &self,
        source_id: &str,
        text: &str,
        config: &ChunkingConfig,
    ) -> Result<Vec<Chunk>, DomainError>;

    /// Get the strategy name
    fn name(&self) -> &'static str;
}

/// Rebuild the source text by dropping each chunk's overlap with its predecessor
pub fn reassemble(chunks: &[Chunk]) -> String {
    let mut text = String::new();
    let mut covered: usize = 0;

    for chunk in chunks {
        let skip = covered.saturating_sub(chunk.char_start);
        text.extend(chunk.text.graphemes(true).skip(skip));
        covered = covered.max(chunk.char_end);
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunking_config_default() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
    }

    #[test]
    fn test_chunking_config_validation() {
        assert!(ChunkingConfig::new(100, 50).validate().is_ok());
        assert!(ChunkingConfig::new(100, 0).validate().is_ok());
        assert!(ChunkingConfig::new(0, 0).validate().is_err());
        assert!(ChunkingConfig::new(100, 100).validate().is_err());
        assert!(ChunkingConfig::new(100, 150).validate().is_err());
    }

    #[test]
    fn test_reassemble_strips_overlap() {
        let chunks = vec![
            Chunk::new("hello wor", "doc", 0, 0, 9),
            Chunk::new("world", "doc", 1, 6, 11),
        ];

        assert_eq!(reassemble(&chunks), "hello world");
    }

    #[test]
    fn test_reassemble_counts_graphemes() {
        let chunks = vec![
            Chunk::new("café", "doc", 0, 0, 4),
            Chunk::new("é!", "doc", 1, 3, 5),
        ];

        assert_eq!(reassemble(&chunks), "café!");
    }

    #[test]
    fn test_chunk_len() {
        let chunk = Chunk::new("abc", "doc", 0, 10, 13);
        assert_eq!(chunk.len(), 3);
        assert!(!chunk.is_empty());
    }
}
