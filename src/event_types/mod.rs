//! Event type management.
//!
//! # Endpoints
//! ```text
//! GET    {base}/event-types          → list
//! GET    {base}/event-types/{name}   → get
//! POST   {base}/event-types          → create (201)
//! PUT    {base}/event-types/{name}   → update (200)
//! DELETE {base}/event-types/{name}   → delete (200 or 204)
//! ```

pub mod api;
pub mod types;

pub use api::EventApi;
pub use types::{
    Category, CompatibilityMode, EnrichmentStrategy, EventType, EventTypeOptions, EventTypeSchema,
    EventTypeStatistics, PartitionStrategy, SchemaType,
};
