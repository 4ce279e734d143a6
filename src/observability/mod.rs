//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! API calls produce:
//!     → tracing spans per operation, events per attempt and retry
//!     → metrics.rs (request and retry counters)
//!
//! Consumers:
//!     → logging.rs installs a subscriber (CLI only; libraries never do)
//!     → whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Every attempt carries a flow id that is recorded on its span
//! - Metrics go through the `metrics` facade; no exporter is bundled

pub mod logging;
pub mod metrics;
