use std::time::Duration;

use thiserror::Error;

/// Error for store round-trips that did not complete in time.
///
/// Infrastructure failure: callers may retry with backoff. Never reported as
/// an authentication or authorization failure.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Store did not respond within {} ms", .limit.as_millis())]
pub struct StoreTimeout {
    pub limit: Duration,
}
