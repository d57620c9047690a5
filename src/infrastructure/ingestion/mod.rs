//! Document ingestion infrastructure
//!
//! Loaders turn uploads into text and chunkers split that text for indexing.

pub mod chunkers;
pub mod factory;
pub mod loaders;

pub use chunkers::RecursiveChunker;
pub use factory::LoaderFactory;
pub use loaders::{MarkdownLoader, PdfLoader, PlainTextLoader};
