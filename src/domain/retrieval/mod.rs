//! Context retrieval seam shared by the agents and the evaluator

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Separator placed between retrieved chunks
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Turns a query into a context string drawn from the session's index
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    /// Most relevant passages for `query`, best first, joined by a blank line.
    ///
    /// An empty index yields an empty string.
    async fn retrieve(&self, query: &str) -> Result<String, DomainError>;
}
