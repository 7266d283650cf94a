//! Optimistic concurrency loop shared by the mutating use cases.
//!
//! Each attempt re-reads the aggregate with its version, applies the domain
//! method and writes back with a compare-and-swap. Only version conflicts
//! are retried; domain rejections and other repository failures end the
//! loop immediately.

use std::fmt::Display;
use std::future::Future;

use crate::infrastructure::config::ConflictRetry;

/// Use-case errors that can carry a lost compare-and-swap.
pub trait ConflictError: Sized {
    fn is_version_conflict(&self) -> bool;

    /// Error returned once every attempt lost the race.
    fn retries_exhausted(attempts: u32) -> Self;
}

pub(crate) async fn retry_on_conflict<T, E, F, Fut>(
    policy: ConflictRetry,
    operation_name: &'static str,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: ConflictError + Display,
{
    let max_attempts = policy.max_attempts();

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(
                        attempt,
                        operation = operation_name,
                        "Write succeeded after version conflict"
                    );
                }
                return Ok(value);
            }
            Err(e) if e.is_version_conflict() => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    error = %e,
                    operation = operation_name,
                    "Version conflict, reloading"
                );
            }
            Err(e) => return Err(e),
        }
    }

    tracing::warn!(
        attempts = max_attempts,
        operation = operation_name,
        "Giving up after repeated version conflicts"
    );
    Err(E::retries_exhausted(max_attempts))
}
