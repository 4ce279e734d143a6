//! HTTP client for the broker API.
//!
//! Owns the base URL, the underlying `reqwest::Client` and the optional
//! token provider. Every round trip goes through [`Client::execute`], which
//! wraps the attempt in the caller's retry policy.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug_span, Instrument};
use url::Url;

use crate::auth::TokenProvider;
use crate::error::{Error, Result};
use crate::http::request::{prepare, FlowId};
use crate::http::response::{accept, Accepted};
use crate::observability::metrics;
use crate::resilience::{retry, RetryPolicy};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Optional parameters of a [`Client`].
#[derive(Clone)]
pub struct ClientOptions {
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Total time for one request/response round trip.
    pub request_timeout: Duration,
    pub user_agent: String,
    pub token_provider: Option<Arc<dyn TokenProvider>>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!("nakadi-client/", env!("CARGO_PKG_VERSION")).to_string(),
            token_provider: None,
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .field("token_provider", &self.token_provider.is_some())
            .finish()
    }
}

/// Connection to one broker instance.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("token_provider", &self.token_provider.is_some())
            .finish()
    }
}

impl Client {
    /// Client with default options.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// # Errors
    ///
    /// `InvalidUrl` if `base_url` is not an absolute http(s) URL, `Config`
    /// if the underlying HTTP client cannot be built.
    pub fn with_options(base_url: &str, options: ClientOptions) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;

        let http = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.request_timeout)
            .user_agent(options.user_agent)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::debug!(base_url = %base_url, "Broker client created");

        Ok(Self {
            base_url,
            http,
            token_provider: options.token_provider,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::invalid_url(self.base_url.as_str(), "cannot be a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `url` and decode a 200 body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        policy: &RetryPolicy,
        url: &Url,
        context: &'static str,
    ) -> Result<T> {
        self.execute::<()>(policy, Method::GET, url, None, &[StatusCode::OK], context)
            .await?
            .json(context)
    }

    /// Send `body` with `method`, accepting only `expected` statuses.
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        policy: &RetryPolicy,
        method: Method,
        url: &Url,
        body: &B,
        expected: &[StatusCode],
        context: &'static str,
    ) -> Result<()> {
        self.execute(policy, method, url, Some(body), expected, context)
            .await
            .map(|_| ())
    }

    pub(crate) async fn delete(&self, policy: &RetryPolicy, url: &Url, context: &'static str) -> Result<()> {
        self.execute::<()>(
            policy,
            Method::DELETE,
            url,
            None,
            &[StatusCode::OK, StatusCode::NO_CONTENT],
            context,
        )
        .await
        .map(|_| ())
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        policy: &RetryPolicy,
        method: Method,
        url: &Url,
        body: Option<&B>,
        expected: &[StatusCode],
        context: &'static str,
    ) -> Result<Accepted> {
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|source| Error::Encode { context, source })?;

        retry(policy, context, || {
            self.attempt(method.clone(), url, body.as_deref(), expected, context)
        })
        .await
    }

    async fn attempt(
        &self,
        method: Method,
        url: &Url,
        body: Option<&[u8]>,
        expected: &[StatusCode],
        context: &'static str,
    ) -> Result<Accepted> {
        let flow_id = FlowId::new();
        let span = debug_span!("broker_request", method = %method, url = %url, flow_id = %flow_id);

        async move {
            let start = Instant::now();
            let request = prepare(
                self.http.request(method.clone(), url.clone()),
                flow_id,
                self.token_provider.as_deref(),
                body,
            )?;

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!(
                        duration_ms = start.elapsed().as_millis() as u64,
                        error = %e,
                        "Request failed"
                    );
                    metrics::record_request(method.as_str(), None);
                    return Err(Error::transport(context, e));
                }
            };

            let status = response.status();
            tracing::debug!(
                status = status.as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Received response"
            );
            metrics::record_request(method.as_str(), Some(status.as_u16()));

            accept(response, expected, context).await
        }
        .instrument(span)
        .await
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| Error::invalid_url(raw, e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_url(raw, format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(Error::invalid_url(raw, "cannot be a base URL"));
    }
    Ok(url)
}
