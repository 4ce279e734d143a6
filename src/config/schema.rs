//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files; every
//! section has defaults so a file naming only `base_url` is complete.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::{EnvToken, TokenProvider};
use crate::http::ClientOptions;
use crate::resilience::RetryOptions;

/// Root configuration of a broker client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Broker base URL (e.g., "https://nakadi.example.org").
    pub base_url: String,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Authentication settings.
    pub auth: AuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeouts: TimeoutConfig::default(),
            retries: RetryConfig::default(),
            auth: AuthConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ClientConfig {
    /// HTTP client options described by this configuration.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            connect_timeout: Duration::from_secs(self.timeouts.connect_secs),
            request_timeout: Duration::from_secs(self.timeouts.request_secs),
            token_provider: self.auth.token_provider(),
            ..ClientOptions::default()
        }
    }
}

/// Timeout configuration for broker requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Initial backoff interval in milliseconds.
    pub initial_interval_ms: u64,

    /// Maximum backoff interval in milliseconds.
    pub max_interval_ms: u64,

    /// Maximum time spent retrying one call, in milliseconds.
    pub max_elapsed_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            initial_interval_ms: 10,
            max_interval_ms: 10_000,
            max_elapsed_ms: 30_000,
        }
    }
}

impl From<&RetryConfig> for RetryOptions {
    fn from(config: &RetryConfig) -> Self {
        RetryOptions {
            retry: config.enabled,
            initial_retry_interval: Duration::from_millis(config.initial_interval_ms),
            max_retry_interval: Duration::from_millis(config.max_interval_ms),
            max_elapsed_time: Duration::from_millis(config.max_elapsed_ms),
        }
        .with_defaults()
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Environment variable holding the bearer token. No token is sent when unset.
    pub token_env: Option<String>,
}

impl AuthConfig {
    pub fn token_provider(&self) -> Option<Arc<dyn TokenProvider>> {
        self.token_env
            .as_deref()
            .map(|var| Arc::new(EnvToken::new(var)) as Arc<dyn TokenProvider>)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
