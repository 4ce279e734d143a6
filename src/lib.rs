//! Client library for the Nakadi event broker.
//!
//! Typed create/read/update/delete operations on event type definitions,
//! with optional exponential-backoff retries around every HTTP call.
//!
//! ```no_run
//! use nakadi_client::{Client, EventApi, RetryOptions};
//!
//! # async fn run() -> nakadi_client::Result<()> {
//! let client = Client::new("https://nakadi.example.org")?;
//! let api = EventApi::new(client, RetryOptions::enabled());
//!
//! for event_type in api.list().await? {
//!     println!("{} ({})", event_type.name, event_type.owning_application);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod event_types;
pub mod http;
pub mod observability;
pub mod problem;
pub mod resilience;

pub use auth::{EnvToken, StaticToken, TokenProvider};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use event_types::{EventApi, EventType};
pub use http::{Client, ClientOptions};
pub use problem::Problem;
pub use resilience::{RetryOptions, RetryPolicy};
