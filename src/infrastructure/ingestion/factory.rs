//! Factory for selecting document loaders

use std::sync::Arc;

use crate::domain::ingestion::{DocumentInput, DocumentKind, DocumentLoader};
use crate::domain::DomainError;

use super::loaders::{MarkdownLoader, PdfLoader, PlainTextLoader};

/// Picks exactly one loader per document; there is no fallback chain
#[derive(Debug, Default)]
pub struct LoaderFactory;

impl LoaderFactory {
    pub fn create(kind: DocumentKind) -> Arc<dyn DocumentLoader> {
        match kind {
            DocumentKind::PlainText => Arc::new(PlainTextLoader::new()),
            DocumentKind::Markdown => Arc::new(MarkdownLoader::new()),
            DocumentKind::Pdf => Arc::new(PdfLoader::new()),
        }
    }

    /// Loader for an upload, chosen by file name; unnamed uploads are plain text
    pub fn for_input(input: &DocumentInput) -> Result<Arc<dyn DocumentLoader>, DomainError> {
        let kind = match input.filename.as_deref() {
            None => DocumentKind::PlainText,
            Some(name) => DocumentKind::from_filename(name).ok_or_else(|| {
                DomainError::document_load(format!(
                    "unsupported document type '{}' (supported: {})",
                    name,
                    Self::supported_extensions().join(", ")
                ))
            })?,
        };

        Ok(Self::create(kind))
    }

    pub fn supported_extensions() -> Vec<&'static str> {
        [DocumentKind::PlainText, DocumentKind::Markdown, DocumentKind::Pdf]
            .iter()
            .flat_map(|k| k.extensions().iter().copied())
            .collect()
    }
}
