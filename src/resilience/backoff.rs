//! Exponential backoff with jitter.
//!
//! A backoff is a countdown owned by a single call: it remembers when the
//! call started and how far the interval has grown. Policies hand out a
//! fresh one per call (see [`RetryPolicy::start`](super::RetryPolicy::start)).

use rand::Rng;
use std::time::Duration;
use tokio::time::Instant;

/// Growth factor applied to the interval after every attempt.
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Delays are drawn from `interval * (1 ± factor)`.
pub const DEFAULT_RANDOMIZATION_FACTOR: f64 = 0.5;

/// Source of delays between attempts.
pub trait Backoff: Send {
    /// Delay before the next attempt, or `None` to give up.
    fn next_backoff(&mut self) -> Option<Duration>;
}

/// Backoff that never allows a second attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopBackoff;

impl Backoff for StopBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        None
    }
}

/// Exponentially growing, randomized delays bounded by a total time budget.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial_interval: Duration,
    max_interval: Duration,
    /// Zero disables the budget. Only reachable through direct construction;
    /// `RetryPolicy` always substitutes a default.
    max_elapsed_time: Duration,
    multiplier: f64,
    randomization_factor: f64,
    current_interval: Duration,
    started_at: Instant,
}

impl ExponentialBackoff {
    /// Start a countdown now.
    pub fn new(initial_interval: Duration, max_interval: Duration, max_elapsed_time: Duration) -> Self {
        Self {
            initial_interval,
            max_interval,
            max_elapsed_time,
            multiplier: DEFAULT_MULTIPLIER,
            randomization_factor: DEFAULT_RANDOMIZATION_FACTOR,
            current_interval: initial_interval.min(max_interval),
            started_at: Instant::now(),
        }
    }

    pub fn with_randomization_factor(mut self, factor: f64) -> Self {
        self.randomization_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Time since the countdown started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Restart the countdown from the initial interval.
    pub fn reset(&mut self) {
        self.current_interval = self.initial_interval.min(self.max_interval);
        self.started_at = Instant::now();
    }

    fn grow_interval(&mut self) {
        if self.current_interval >= self.max_interval {
            self.current_interval = self.max_interval;
            return;
        }
        let grown = Duration::try_from_secs_f64(self.current_interval.as_secs_f64() * self.multiplier)
            .unwrap_or(self.max_interval);
        self.current_interval = grown.min(self.max_interval);
    }
}

impl Backoff for ExponentialBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        let elapsed = self.elapsed();
        let delay = randomize(self.current_interval, self.randomization_factor);
        self.grow_interval();

        if !self.max_elapsed_time.is_zero() && elapsed.saturating_add(delay) > self.max_elapsed_time {
            return None;
        }
        Some(delay)
    }
}

/// Pick a delay uniformly from `[interval - factor * interval, interval + factor * interval]`.
fn randomize(interval: Duration, factor: f64) -> Duration {
    if factor <= 0.0 || interval.is_zero() {
        return interval;
    }

    let secs = interval.as_secs_f64();
    let delta = secs * factor;
    let jittered = rand::thread_rng().gen_range((secs - delta)..=(secs + delta));

    Duration::try_from_secs_f64(jittered.max(0.0)).unwrap_or(interval)
}
