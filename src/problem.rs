//! Problem payloads returned by the broker on failure.
//!
//! The broker answers every non-success status with an
//! `application/problem+json` body. Only `detail` is relied upon; the other
//! members are kept for diagnostics.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Structured error body of a failed request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Problem {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Human readable explanation of this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl Problem {
    /// Decode a failure body.
    ///
    /// An empty body yields an empty problem rather than an error, since
    /// proxies in front of the broker often answer 5xx without content.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }

    /// Message used in error output: `detail`, then `title`, then the status line.
    pub fn describe(&self, status: &StatusCode) -> String {
        match (self.detail.as_deref(), self.title.as_deref()) {
            (Some(detail), _) if !detail.is_empty() => detail.to_string(),
            (_, Some(title)) if !title.is_empty() => title.to_string(),
            _ => format!("unexpected response status {status}"),
        }
    }
}
