//! Per-round-trip deadline enforcement for store calls.

use std::future::Future;
use std::time::Duration;

use crate::core::StoreError;

/// Run a single store round-trip, failing with [`StoreError::Timeout`] when it
/// does not complete within `limit`.
pub async fn round_trip<T, F>(limit: Duration, op: &'static str, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    if let Ok(result) = tokio::time::timeout(limit, fut).await {
        result
    } else {
        tracing::warn!(op, ?limit, "store round-trip timed out");
        Err(StoreError::Timeout { op, after: limit })
    }
}
