//! Document loader trait and input types

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PlainText,
    Markdown,
    Pdf,
}

impl DocumentKind {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::PlainText => &["txt", "text"],
            Self::Markdown => &["md", "markdown"],
            Self::Pdf => &["pdf"],
        }
    }

    pub fn mime_types(&self) -> &'static [&'static str] {
        match self {
            Self::PlainText => &["text/plain"],
            Self::Markdown => &["text/markdown", "text/x-markdown"],
            Self::Pdf => &["application/pdf"],
        }
    }

    /// Detect the format from a file name, by extension first and MIME guess second
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())?;

        let all = [Self::PlainText, Self::Markdown, Self::Pdf];

        if let Some(kind) = all.iter().find(|k| k.extensions().contains(&ext.as_str())) {
            return Some(*kind);
        }

        let mime = mime_guess::from_ext(&ext).first()?;
        Self::from_mime(mime.essence_str())
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        [Self::PlainText, Self::Markdown, Self::Pdf]
            .into_iter()
            .find(|k| k.mime_types().iter().any(|m| mime.starts_with(m)))
    }
}

/// Uploaded document: raw bytes plus the name it was uploaded under
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub bytes: Bytes,
    pub filename: Option<String>,
}

impl DocumentInput {
    pub fn new(bytes: impl Into<Bytes>, filename: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            filename: Some(filename.into()),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            bytes: Bytes::from(text.into()),
            filename: None,
        }
    }

    /// The file name when known, else a digest of the content
    pub fn source_id(&self) -> String {
        match &self.filename {
            Some(name) => name.clone(),
            None => {
                let digest = Sha256::digest(&self.bytes);
                format!("sha256:{}", &hex::encode(digest)[..16])
            }
        }
    }
}

/// Plain text extracted from a document
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub source_id: String,
    pub kind: DocumentKind,
    pub text: String,
}

/// Converts uploaded bytes of one format into plain text
#[async_trait]
pub trait DocumentLoader: Send + Sync + Debug {
    fn kind(&self) -> DocumentKind;

    async fn load(&self, input: &DocumentInput) -> Result<LoadedDocument, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_filename() {
        assert_eq!(DocumentKind::from_filename("notes.txt"), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::from_filename("README.MD"), Some(DocumentKind::Markdown));
        assert_eq!(DocumentKind::from_filename("paper.pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_filename("image.png"), None);
        assert_eq!(DocumentKind::from_filename("noextension"), None);
    }

    #[test]
    fn test_detect_from_mime() {
        assert_eq!(
            DocumentKind::from_mime("text/plain; charset=utf-8"),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(DocumentKind::from_mime("application/pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_mime("image/png"), None);
    }

    #[test]
    fn test_source_id_prefers_filename() {
        let input = DocumentInput::new(b"abc".to_vec(), "report.pdf");
        assert_eq!(input.source_id(), "report.pdf");
    }

    #[test]
    fn test_source_id_digest_is_stable() {
        let a = DocumentInput::from_text("same content");
        let b = DocumentInput::from_text("same content");
        let c = DocumentInput::from_text("other content");

        assert!(a.source_id().starts_with("sha256:"));
        assert_eq!(a.source_id().len(), "sha256:".len() + 16);
        assert_eq!(a.source_id(), b.source_id());
        assert_ne!(a.source_id(), c.source_id());
    }
}
