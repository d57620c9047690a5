//! PDF document loader

use async_trait::async_trait;
use tracing::debug;

use super::require_text;
use crate::domain::ingestion::{DocumentInput, DocumentKind, DocumentLoader, LoadedDocument};
use crate::domain::DomainError;

/// Extracts the text layer of a PDF with `pdf-extract`
#[derive(Debug, Clone, Default)]
pub struct PdfLoader;

impl PdfLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentLoader for PdfLoader {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    async fn load(&self, input: &DocumentInput) -> Result<LoadedDocument, DomainError> {
        let source_id = input.source_id();
        let bytes = input.bytes.clone();

        // pdf-extract is CPU bound and may panic on malformed files
        let extracted = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
        })
        .await
        .map_err(|e| DomainError::document_load(format!("PDF extraction aborted: {}", e)))?
        .map_err(|e| DomainError::document_load(format!("Unreadable PDF: {}", e)))?;

        debug!(source = %source_id, chars = extracted.len(), "Extracted PDF text");

        let text = require_text(&source_id, extracted)?;

        Ok(LoadedDocument {
            source_id,
            kind: DocumentKind::Pdf,
            text,
        })
    }
}
