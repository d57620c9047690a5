//! Document loader implementations

mod markdown;
mod pdf;
mod plain_text;

pub use markdown::MarkdownLoader;
pub use pdf::PdfLoader;
pub use plain_text::PlainTextLoader;

use crate::domain::DomainError;

/// Decode UTF-8, dropping a leading byte-order mark
pub(crate) fn decode_utf8(bytes: &[u8]) -> Result<String, DomainError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| DomainError::document_load(format!("Invalid UTF-8: {}", e)))?;

    Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
}

/// A document with nothing but whitespace cannot be indexed
pub(crate) fn require_text(source_id: &str, text: String) -> Result<String, DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::document_load(format!(
            "'{}' contains no extractable text",
            source_id
        )));
    }

    Ok(text)
}
