//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! API call:
//!     → RetryPolicy::start() (fresh backoff countdown)
//!     → retries.rs (run attempt, classify failure)
//!     → On transient failure: backoff.rs (next delay or give up)
//! ```
//!
//! # Design Decisions
//! - Backoff state lives per call; the policy itself is immutable and shared
//! - Only transient failures (transport, 5xx, 429) are retried
//! - The elapsed-time budget is the only cancellation primitive

pub mod backoff;
pub mod retries;

pub use backoff::{Backoff, ExponentialBackoff, StopBackoff};
pub use retries::{retry, RetryOptions, RetryPolicy};
