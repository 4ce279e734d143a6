//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! EventApi call
//!     → client.rs (build URL, serialize body once, apply retry policy)
//!     → request.rs (flow id, bearer token, content type)
//!     → reqwest round trip
//!     → response.rs (status check, problem decode, body decode)
//! ```

pub mod client;
pub mod request;
pub mod response;

pub use client::{Client, ClientOptions};
pub use request::{FlowId, X_FLOW_ID};
