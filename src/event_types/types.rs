//! Event type resources as exchanged with the broker.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of the events published under an event type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Free form events without broker-managed metadata.
    #[default]
    Undefined,
    /// Change data capture style events.
    Data,
    /// Events describing steps of a business process.
    Business,
    /// A category this client does not know yet, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

/// Enrichment applied by the broker to published events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStrategy {
    MetadataEnrichment,
    #[serde(untagged)]
    Other(String),
}

/// How events are assigned to partitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionStrategy {
    Random,
    /// Hash of `partition_key_fields`.
    Hash,
    UserDefined,
    #[serde(untagged)]
    Other(String),
}

/// Rules for evolving the schema of an event type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityMode {
    Compatible,
    Forward,
    None,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaType {
    #[default]
    JsonSchema,
    AvroSchema,
    #[serde(untagged)]
    Other(String),
}

/// A kind of event that can be published to and consumed from the broker.
///
/// `name` is the identity of the resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    pub name: String,
    pub owning_application: String,

    #[serde(default)]
    pub category: Category,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enrichment_strategies: Vec<EnrichmentStrategy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_strategy: Option<PartitionStrategy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility_mode: Option<CompatibilityMode>,

    /// Mandatory on creation, but tolerated as absent on decode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<EventTypeSchema>,

    /// Always sent, even when empty.
    #[serde(default)]
    pub partition_key_fields: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_statistics: Option<EventTypeStatistics>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<EventTypeOptions>,

    /// Set by the broker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Set by the broker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EventType {
    /// Event type with the mandatory fields set and everything else left to
    /// broker defaults.
    pub fn new(
        name: impl Into<String>,
        owning_application: impl Into<String>,
        category: Category,
        schema: EventTypeSchema,
    ) -> Self {
        Self {
            name: name.into(),
            owning_application: owning_application.into(),
            category,
            enrichment_strategies: Vec::new(),
            partition_strategy: None,
            compatibility_mode: None,
            schema: Some(schema),
            partition_key_fields: Vec::new(),
            default_statistics: None,
            options: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Schema of the events of an event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeSchema {
    /// Assigned by the broker, bumped on every schema change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(rename = "type", default)]
    pub schema_type: SchemaType,

    /// The schema document itself, as a string.
    pub schema: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl EventTypeSchema {
    pub fn json_schema(schema: impl Into<String>) -> Self {
        Self {
            version: None,
            schema_type: SchemaType::JsonSchema,
            schema: schema.into(),
            created_at: None,
        }
    }
}

/// Expected traffic of an event type, used by the broker to size partitions.
/// Only honoured on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeStatistics {
    pub messages_per_minute: u64,
    /// Average event size in bytes.
    pub message_size: u64,
    pub read_parallelism: u32,
    pub write_parallelism: u32,
}

/// Tuning parameters of an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeOptions {
    /// Retention time in milliseconds.
    pub retention_time: i64,
}

impl EventTypeOptions {
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            retention_time: i64::try_from(retention.as_millis()).unwrap_or(i64::MAX),
        }
    }

    /// Retention as a duration; negative values count as zero.
    pub fn retention(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.retention_time).unwrap_or(0))
    }
}
