//! Retry policy applied to every mirror network operation.

use std::fmt::Display;
use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

/// How the wait between attempts grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// Same delay before every retry
    Fixed,
    /// `delay * n` before the n-th retry
    #[default]
    Linear,
}

/// Maximum retry count plus the delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub delay: Duration,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    /// Three retries with a linear one-second backoff.
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(1),
            backoff: Backoff::Linear,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration, backoff: Backoff) -> Self {
        Self {
            max_retries,
            delay,
            backoff,
        }
    }

    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, Backoff::Fixed)
    }

    /// Total attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Wait before the given retry (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Linear => self.delay.saturating_mul(retry.max(1)),
        }
    }

    /// Run `op` until it succeeds or the retries are used up.
    ///
    /// `op` receives the 0-based attempt number. The last error is returned
    /// when every attempt fails.
    pub async fn run<T, E, F, Fut>(&self, what: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    let wait = self.delay_for(attempt);
                    log::debug!(
                        "{} failed (attempt {}/{}): {}; retrying in {}ms",
                        what,
                        attempt,
                        self.max_attempts(),
                        e,
                        wait.as_millis(),
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/retry_tests.rs"]
mod tests;
