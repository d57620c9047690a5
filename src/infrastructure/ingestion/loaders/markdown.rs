//! Markdown document loader

use async_trait::async_trait;
use pulldown_cmark::{Event, Parser, Tag};

use super::{decode_utf8, require_text};
use crate::domain::ingestion::{DocumentInput, DocumentKind, DocumentLoader, LoadedDocument};
use crate::domain::DomainError;

/// Renders Markdown to plain text, one block per paragraph
#[derive(Debug, Clone, Default)]
pub struct MarkdownLoader;

impl MarkdownLoader {
    pub fn new() -> Self {
        Self
    }

    fn render_text(markdown: &str) -> String {
        let mut blocks: Vec<String> = Vec::new();
        let mut current = String::new();

        let flush = |current: &mut String, blocks: &mut Vec<String>| {
            let block = current.trim();
            if !block.is_empty() {
                blocks.push(block.to_string());
            }
            current.clear();
        };

        for event in Parser::new(markdown) {
            match event {
                Event::Start(Tag::Heading(..))
                | Event::Start(Tag::Paragraph)
                | Event::Start(Tag::CodeBlock(_)) => flush(&mut current, &mut blocks),
                Event::End(Tag::Heading(..))
                | Event::End(Tag::Paragraph)
                | Event::End(Tag::CodeBlock(_)) => flush(&mut current, &mut blocks),
                Event::Start(Tag::Item) => {
                    if !current.trim().is_empty() {
                        current.push('\n');
                    }
                    current.push_str("- ");
                }
                Event::End(Tag::List(_)) => flush(&mut current, &mut blocks),
                Event::Text(t) | Event::Code(t) => current.push_str(&t),
                Event::SoftBreak => current.push(' '),
                Event::HardBreak => current.push('\n'),
                _ => {}
            }
        }
        flush(&mut current, &mut blocks);

        blocks.join("\n\n")
    }
}

#[async_trait]
impl DocumentLoader for MarkdownLoader {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Markdown
    }

    async fn load(&self, input: &DocumentInput) -> Result<LoadedDocument, DomainError> {
        let source_id = input.source_id();
        let raw = decode_utf8(&input.bytes)?;
        let text = require_text(&source_id, Self::render_text(&raw))?;

        Ok(LoadedDocument {
            source_id,
            kind: DocumentKind::Markdown,
            text,
        })
    }
}
