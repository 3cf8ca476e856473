use std::future::Future;
use std::time::Duration;

use crate::domain::errors::StoreTimeout;

/// Run a store operation, failing with `StoreTimeout` once `limit` elapses.
///
/// The operation's own error is passed through unchanged.
pub async fn bounded<F, T, E>(limit: Duration, operation: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<StoreTimeout>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(limit_ms = limit.as_millis() as u64, "Store operation timed out");
            Err(StoreTimeout { limit }.into())
        }
    }
}
