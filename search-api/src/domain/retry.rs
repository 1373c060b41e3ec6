//! Bounded retry with a fixed delay between attempts.
//!
//! Used by the store connector at startup and by the generation client.
//! The loop is a plain future: async callers `.await` it, blocking callers
//! can drive it with `tokio::runtime::Handle::block_on`.

use std::{fmt::Display, future::Future, time::Duration};

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one. Never zero.
    pub max_attempts: u32,
    /// Pause between two consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Time spent sleeping when every attempt fails. There is no sleep after
    /// the final attempt.
    pub fn total_backoff(&self) -> Duration {
        self.delay * (self.max_attempts - 1)
    }
}

/// Returned when every attempt failed.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Runs `attempt_fn` until it succeeds or `policy.max_attempts` is reached.
///
/// The closure receives the 1-based attempt number.
pub async fn retry<T, E, F, Fut>(
    policy: RetryPolicy,
    operation: &str,
    mut attempt_fn: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;

    loop {
        match attempt_fn(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    info!(operation, attempt, "Succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) if attempt >= policy.max_attempts => {
                warn!(operation, attempt, error = %e, "Final attempt failed, giving up");
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(e) => {
                warn!(
                    operation,
                    attempt,
                    max_attempts = policy.max_attempts,
                    retry_in_ms = policy.delay.as_millis() as u64,
                    error = %e,
                    "Attempt failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}
