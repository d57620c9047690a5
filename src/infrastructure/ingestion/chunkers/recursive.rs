//! Recursive character chunking strategy

use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::domain::ingestion::{Chunk, ChunkingConfig, ChunkingStrategy};
use crate::domain::DomainError;

/// Boundary kinds, most preferred first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Paragraph,
    Line,
    Sentence,
    Word,
}

const BOUNDARIES: [Boundary; 4] = [
    Boundary::Paragraph,
    Boundary::Line,
    Boundary::Sentence,
    Boundary::Word,
];

fn is_newline(g: &str) -> bool {
    g == "\n" || g == "\r\n"
}

fn is_terminator(g: &str) -> bool {
    matches!(g, "." | "!" | "?")
}

impl Boundary {
    /// Whether a split right before grapheme `pos` falls just after this boundary
    fn ends_at(&self, graphemes: &[&str], pos: usize) -> bool {
        match self {
            Self::Paragraph => {
                pos >= 2 && is_newline(graphemes[pos - 1]) && is_newline(graphemes[pos - 2])
            }
            Self::Line => pos >= 1 && is_newline(graphemes[pos - 1]),
            Self::Sentence => {
                pos >= 2 && graphemes[pos - 1] == " " && is_terminator(graphemes[pos - 2])
            }
            Self::Word => pos >= 1 && graphemes[pos - 1].chars().all(char::is_whitespace),
        }
    }
}

/// Sliding-window chunker that cuts at the best natural boundary.
///
/// Each window holds at most `chunk_size` graphemes. Inside it the cut goes
/// after the last paragraph break, else line break, else sentence end, else
/// space; without any of those it is a hard cut at the limit. The next window
/// starts `chunk_overlap` graphemes before the cut. Text is never trimmed, so
/// chunks map back onto the source exactly.
#[derive(Debug, Clone, Default)]
pub struct RecursiveChunker;

impl RecursiveChunker {
    pub fn new() -> Self {
        Self
    }

    /// Best cut in `(floor, limit]`
    fn find_split(graphemes: &[&str], floor: usize, limit: usize) -> usize {
        for boundary in BOUNDARIES {
            if let Some(pos) = ((floor + 1)..=limit)
                .rev()
                .find(|&pos| boundary.ends_at(graphemes, pos))
            {
                return pos;
            }
        }

        limit
    }
}

impl ChunkingStrategy for RecursiveChunker {
    fn split(
        &self,
        source_id: &str,
        text: &str,
        config: &ChunkingConfig,
    ) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        let graphemes: Vec<&str> = text.graphemes(true).collect();
        let total = graphemes.len();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < total {
            let limit = (start + config.chunk_size).min(total);

            // The cut must pass the overlap so the next window moves forward
            let end = if limit == total {
                total
            } else {
                Self::find_split(&graphemes, start + config.chunk_overlap, limit)
            };

            chunks.push(Chunk::new(
                graphemes[start..end].concat(),
                source_id,
                chunks.len(),
                start,
                end,
            ));

            if end == total {
                break;
            }

            start = end - config.chunk_overlap;
        }

        debug!(
            source = %source_id,
            graphemes = total,
            chunks = chunks.len(),
            "Split document"
        );

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "recursive"
    }
}
