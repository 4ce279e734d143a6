//! Access tokens for the broker API.
//!
//! Tokens are fetched once per attempt, so a provider backed by a refreshing
//! credential source picks up rotated tokens between retries.

use std::fmt;

use crate::error::{Error, Result};

/// Supplies the bearer token sent in the `Authorization` header.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Result<String>;
}

/// A fixed token.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Reads the token from an environment variable on every request.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl TokenProvider for EnvToken {
    fn token(&self) -> Result<String> {
        match std::env::var(&self.var) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            Ok(_) => Err(Error::Auth(format!("environment variable {} is empty", self.var))),
            Err(e) => Err(Error::Auth(format!("{}: {e}", self.var))),
        }
    }
}

/// `Authorization` header value for a token.
pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
