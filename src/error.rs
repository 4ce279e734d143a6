//! Error types for broker client operations.
//!
//! Transport and remote failures carry the operation context they occurred
//! in ("unable to create event type") so callers see which call failed.

use reqwest::StatusCode;
use thiserror::Error;

use crate::problem::Problem;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the broker client.
#[derive(Debug, Error)]
pub enum Error {
    /// Network failure or timeout before a response was received.
    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// A request body could not be serialized.
    #[error("{context}: unable to encode request body: {source}")]
    Encode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A response body could not be decoded.
    #[error("{context}: unable to decode response body: {source}")]
    Decode {
        context: &'static str,
        /// Status of the response whose body failed to decode.
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    /// The broker answered with a non-success status.
    #[error("{context}: {}", .problem.describe(.status))]
    Remote {
        context: &'static str,
        status: StatusCode,
        problem: Problem,
    },

    /// The backoff budget ran out; `last` is the final attempt's error.
    #[error("retry budget exhausted after {attempts} attempts: {last}")]
    RetryExhausted { attempts: u32, last: Box<Error> },

    /// The token provider could not supply a token.
    #[error("unable to obtain access token: {0}")]
    Auth(String),

    /// A broker URL could not be parsed or used as a base.
    #[error("invalid broker URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The client could not be configured.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn transport(context: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { context, source }
    }

    pub(crate) fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status of the failed response, if the broker answered at all.
    ///
    /// Looks through `RetryExhausted` to the last attempt.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Decode { status, .. } | Self::Remote { status, .. } => Some(*status),
            Self::RetryExhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// The problem payload returned by the broker, if any.
    pub fn problem(&self) -> Option<&Problem> {
        match self {
            Self::Remote { problem, .. } => Some(problem),
            Self::RetryExhausted { last, .. } => last.problem(),
            _ => None,
        }
    }

    /// The requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// The resource already exists or was rejected by validation.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::CONFLICT) | Some(StatusCode::UNPROCESSABLE_ENTITY)
        )
    }

    /// Whether another attempt could succeed.
    ///
    /// Transport failures, 5xx and 429 are transient. Everything else,
    /// including undecodable success bodies, is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Remote { status, .. } => is_transient_status(*status),
            Self::Decode { status, .. } => is_transient_status(*status),
            Self::Encode { .. }
            | Self::RetryExhausted { .. }
            | Self::Auth(_)
            | Self::InvalidUrl { .. }
            | Self::Config(_) => false,
        }
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
