//! Retry policy and the attempt loop.
//!
//! # Responsibilities
//! - Turn user-facing `RetryOptions` into an immutable `RetryPolicy`
//! - Hand out a fresh backoff countdown for every call
//! - Re-run transient failures until the backoff gives up
//!
//! Permanent failures (4xx other than 429, undecodable success bodies,
//! auth errors) are returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::observability::metrics;
use crate::resilience::backoff::{Backoff, ExponentialBackoff, StopBackoff};

pub const DEFAULT_INITIAL_RETRY_INTERVAL: Duration = Duration::from_millis(10);
pub const DEFAULT_MAX_RETRY_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_ELAPSED_TIME: Duration = Duration::from_secs(30);

/// Optional retry parameters for the event type API.
///
/// Zero durations mean "use the default". The intervals and the elapsed time
/// budget have no effect unless `retry` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryOptions {
    /// Whether failed requests are retried (default: false).
    pub retry: bool,
    /// First (minimal) delay between attempts.
    pub initial_retry_interval: Duration,
    /// Once the backoff reaches this value the delays stay constant.
    pub max_retry_interval: Duration,
    /// Total time spent retrying one call before giving up.
    pub max_elapsed_time: Duration,
}

impl RetryOptions {
    /// Retries enabled with default bounds.
    pub fn enabled() -> Self {
        Self {
            retry: true,
            ..Self::default()
        }
        .with_defaults()
    }

    /// Replace unset durations with the defaults.
    pub fn with_defaults(mut self) -> Self {
        if self.initial_retry_interval.is_zero() {
            self.initial_retry_interval = DEFAULT_INITIAL_RETRY_INTERVAL;
        }
        if self.max_retry_interval.is_zero() {
            self.max_retry_interval = DEFAULT_MAX_RETRY_INTERVAL;
        }
        if self.max_elapsed_time.is_zero() {
            self.max_elapsed_time = DEFAULT_MAX_ELAPSED_TIME;
        }
        self
    }
}

/// Immutable backoff factory shared by every call of an API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    options: RetryOptions,
}

impl RetryPolicy {
    pub fn new(options: RetryOptions) -> Self {
        Self {
            options: options.with_defaults(),
        }
    }

    /// Single attempt, no retries.
    pub fn disabled() -> Self {
        Self::new(RetryOptions::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.options.retry
    }

    /// Effective options, defaults applied.
    pub fn options(&self) -> &RetryOptions {
        &self.options
    }

    /// Fresh backoff countdown for one call.
    pub fn start(&self) -> Box<dyn Backoff> {
        if !self.options.retry {
            return Box::new(StopBackoff);
        }
        Box::new(ExponentialBackoff::new(
            self.options.initial_retry_interval,
            self.options.max_retry_interval,
            self.options.max_elapsed_time,
        ))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

impl From<RetryOptions> for RetryPolicy {
    fn from(options: RetryOptions) -> Self {
        Self::new(options)
    }
}

/// Run `attempt` until it succeeds, fails permanently, or the backoff gives up.
///
/// With a single attempt the error is returned as is; after several attempts
/// it is wrapped in [`Error::RetryExhausted`].
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, operation: &'static str, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff = policy.start();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let err = match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => return Err(err),
            Err(err) => err,
        };

        let Some(delay) = backoff.next_backoff() else {
            if attempts == 1 {
                return Err(err);
            }
            tracing::warn!(operation, attempts, error = %err, "Retry budget exhausted");
            return Err(Error::RetryExhausted {
                attempts,
                last: Box::new(err),
            });
        };

        tracing::warn!(
            operation,
            attempt = attempts,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Transient failure, retrying"
        );
        metrics::record_retry(operation);
        tokio::time::sleep(delay).await;
    }
}
