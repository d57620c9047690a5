use std::future::Future;
use std::time::Duration;

use crate::domain::DomainError;

/// Run `future` with a deadline, mapping expiry to `DomainError::Timeout`
pub async fn bounded<T, F>(operation: &str, limit: Duration, future: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::timeout(operation, limit.as_millis() as u64)),
    }
}
