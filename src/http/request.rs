//! Outgoing request preparation.
//!
//! # Responsibilities
//! - Generate a flow id (UUID v4) per attempt
//! - Attach flow id, bearer token and content type headers
//!
//! # Design Decisions
//! - Flow id is regenerated for every attempt so broker logs can tell
//!   retries apart
//! - Bodies are serialized once per call, before the first attempt

use std::fmt;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::RequestBuilder;
use uuid::Uuid;

use crate::auth::{bearer, TokenProvider};
use crate::error::Result;

/// Correlation header understood by the broker.
pub const X_FLOW_ID: &str = "X-Flow-Id";

/// Correlation id of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowId(Uuid);

impl FlowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FlowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Add the standard headers and, if present, the JSON body.
pub(crate) fn prepare(
    builder: RequestBuilder,
    flow_id: FlowId,
    token_provider: Option<&dyn TokenProvider>,
    body: Option<&[u8]>,
) -> Result<RequestBuilder> {
    let mut builder = builder
        .header(X_FLOW_ID, flow_id.to_string())
        .header(ACCEPT, "application/json, application/problem+json");

    if let Some(provider) = token_provider {
        builder = builder.header(AUTHORIZATION, bearer(&provider.token()?));
    }

    if let Some(body) = body {
        builder = builder
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_vec());
    }

    Ok(builder)
}
