//! Timeout wrapper for repository calls.

use std::future::Future;
use std::time::Duration;

use larder_core::error::{LarderError, LarderResult};
use tracing::warn;

/// Run `call`, failing with `Unavailable` if it outlives `limit`.
///
/// A timed-out write may still commit; callers treat `Unavailable` as
/// "outcome unknown, safe to re-read and retry".
pub(crate) async fn bounded<T>(
    limit: Duration,
    operation: &'static str,
    call: impl Future<Output = LarderResult<T>>,
) -> LarderResult<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, timeout_ms = limit.as_millis() as u64, "store call timed out");
            Err(LarderError::Unavailable(format!("{operation} timed out")))
        }
    }
}
