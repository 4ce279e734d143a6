//! Response handling.
//!
//! # Responsibilities
//! - Accept only the status codes an operation expects
//! - Decode problem payloads of failed responses into `Error::Remote`
//! - Decode success bodies into typed resources

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::problem::Problem;

/// Buffered body of an accepted response.
#[derive(Debug, Clone)]
pub(crate) struct Accepted {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Accepted {
    pub fn json<T: DeserializeOwned>(&self, context: &'static str) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|source| Error::Decode {
            context,
            status: self.status,
            source,
        })
    }
}

/// Read the body and check the status against `expected`.
pub(crate) async fn accept(
    response: Response,
    expected: &[StatusCode],
    context: &'static str,
) -> Result<Accepted> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| Error::transport(context, e))?;

    if expected.contains(&status) {
        return Ok(Accepted {
            status,
            body: body.to_vec(),
        });
    }

    let problem = Problem::from_body(&body).map_err(|source| Error::Decode {
        context,
        status,
        source,
    })?;
    Err(Error::Remote {
        context,
        status,
        problem,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_decode_error_keeps_status() {
        let accepted = Accepted {
            status: StatusCode::OK,
            body: b"not json".to_vec(),
        };
        let err = accepted.json::<serde_json::Value>("unable to request event types").unwrap_err();
        assert!(matches!(err, Error::Decode { status: StatusCode::OK, .. }));
        assert!(err.to_string().starts_with("unable to request event types: unable to decode"));
    }
}
