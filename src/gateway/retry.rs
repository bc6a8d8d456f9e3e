//! Gateway call retry with exponential backoff.
//!
//! Enforcement calls (restoring permissions, removing a member) are retried
//! on transient network failures so a flaky connection does not leave a
//! member muted or in the group. Cleanup calls are never retried.

use super::traits::GatewayError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Maximum retry attempts before giving up.
const MAX_RETRIES: u32 = 4;

/// Maximum backoff between attempts.
const MAX_BACKOFF_SECS: u64 = 8;

/// Longest server-requested wait honored per attempt.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Give up and return the error
    Stop,
    /// Retry after the exponential backoff
    Backoff,
    /// Retry after at least this long
    After(Duration),
}

/// Retry an operation with exponential backoff.
///
/// Backoff is 2^n seconds (1, 2, 4, 8), capped at `MAX_BACKOFF_SECS`, for up
/// to `MAX_RETRIES` retries. `RetryPolicy::After` stretches a single wait to
/// the requested delay. Returns the last error once retries are exhausted or
/// as soon as `policy` says stop.
pub async fn retry_with_backoff<F, Fut, T, E>(
    mut operation: F,
    policy: fn(&E) -> RetryPolicy,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                let decision = policy(&err);
                if decision == RetryPolicy::Stop || attempt >= MAX_RETRIES {
                    return Err(err);
                }

                let backoff = Duration::from_secs(2u64.pow(attempt).min(MAX_BACKOFF_SECS));
                let delay = match decision {
                    RetryPolicy::After(requested) => requested.max(backoff),
                    _ => backoff,
                };
                warn!(
                    attempt = attempt + 1,
                    delay_secs = delay.as_secs(),
                    "Gateway call failed, retrying: {}",
                    err
                );

                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Retry policy for gateway errors: transient errors back off, rate limits
/// wait as long as the platform asks (up to a minute).
pub fn gateway_retry_policy(err: &GatewayError) -> RetryPolicy {
    match err.retry_after() {
        Some(requested) => RetryPolicy::After(requested.min(MAX_RETRY_AFTER)),
        None if err.is_transient() => RetryPolicy::Backoff,
        None => RetryPolicy::Stop,
    }
}
