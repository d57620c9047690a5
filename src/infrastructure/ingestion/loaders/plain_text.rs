//! Plain text document loader

use async_trait::async_trait;

use super::{decode_utf8, require_text};
use crate::domain::ingestion::{DocumentInput, DocumentKind, DocumentLoader, LoadedDocument};
use crate::domain::DomainError;

#[derive(Debug, Clone, Default)]
pub struct PlainTextLoader;

impl PlainTextLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentLoader for PlainTextLoader {
    fn kind(&self) -> DocumentKind {
        DocumentKind::PlainText
    }

    async fn load(&self, input: &DocumentInput) -> Result<LoadedDocument, DomainError> {
        let source_id = input.source_id();
        let text = require_text(&source_id, decode_utf8(&input.bytes)?)?;

        Ok(LoadedDocument {
            source_id,
            kind: DocumentKind::PlainText,
            text,
        })
    }
}
