//! Retry policy for backend calls
//!
//! Linear backoff: the n-th retry waits `n * retry_delay`. Only transient
//! errors (see [`RagError::is_transient`]) are retried; anything else fails
//! immediately.

use std::future::Future;
use std::time::Duration;

use backoff::backoff::Backoff;
use tracing::{debug, warn};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::RetrievalConfig;

/// Backoff schedule growing by a fixed step per retry
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    step: Duration,
    max_retries: u32,
    attempt: u32,
}

impl LinearBackoff {
    pub fn new(step: Duration, max_retries: u32) -> Self {
        Self {
            step,
            max_retries,
            attempt: 0,
        }
    }
}

impl Backoff for LinearBackoff {
    fn reset(&mut self) {
        self.attempt = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_retries {
            return None;
        }
        self.attempt += 1;
        Some(self.step * self.attempt)
    }
}

/// Retry policy shared by query embedding and chat completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay step between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.max_retries, config.retry_delay())
    }

    /// Fresh backoff schedule for one retried call
    pub fn backoff(&self) -> LinearBackoff {
        LinearBackoff::new(self.delay, self.max_retries)
    }

    /// Execute an operation with linear backoff retry logic
    ///
    /// # Arguments
    /// * `label` - Operation name used in log records
    /// * `operation` - Async function producing a fresh attempt on each call
    ///
    /// # Returns
    /// * `Ok(T)` - An attempt succeeded
    /// * `Err(RagError)` - A permanent error, or the last transient error once
    ///   retries are exhausted
    pub async fn execute<F, Fut, T>(&self, label: &str, mut operation: F) -> RagResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RagResult<T>>,
    {
        let mut retry = 0u32;

        let result = backoff::future::retry_notify(
            self.backoff(),
            || {
                let attempt = operation();
                async move {
                    attempt.await.map_err(|err| {
                        if err.is_transient() {
                            backoff::Error::transient(err)
                        } else {
                            backoff::Error::permanent(err)
                        }
                    })
                }
            },
            |err: RagError, delay: Duration| {
                retry += 1;
                warn!(
                    operation = label,
                    retry,
                    delay_ms = delay.as_millis() as u64,
                    error = %err.summary(),
                    "Backend call failed, retrying"
                );
            },
        )
        .await;

        if let Err(ref err) = result {
            debug!(operation = label, error = %err.summary(), "Giving up on backend call");
        }

        result
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetrievalConfig::default())
    }
}
