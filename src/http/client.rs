//! Request executor
//!
//! Sends one authenticated request, gunzips the body and classifies the
//! response:
//! - `429` → `Error::RateLimited` with the `X-Rate-Limit-Reset` instant
//! - `401` → `Error::Unauthorized`
//! - any other non-`200` → `Error::HttpStatus`
//! - `200` → the body decoded as JSON into the caller's type
//!
//! There is no retry at this layer; the caller owns the retry policy.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::BearerToken;
use crate::error::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use flate2::read::GzDecoder;
use reqwest::header::{HeaderMap, ACCEPT_ENCODING, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::io::Read;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Header carrying the epoch second at which the rate limit window resets
pub const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";

/// Reset delay assumed when a 429 carries no usable reset header
pub const DEFAULT_RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(16 * 60);

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Optional client-side pacing
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            rate_limit: None,
            user_agent: format!("twitter-graph/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// A response whose body has already been read and gunzipped
#[derive(Debug)]
pub struct RawResponse {
    /// Response status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Decompressed body
    pub body: Vec<u8>,
}

/// HTTP client that executes API requests
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Build a bearer-authenticated request that asks for a gzip body
    pub fn prepare(&self, method: Method, url: Url, token: &BearerToken) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", token.as_str()))
            .header(ACCEPT_ENCODING, "gzip")
    }

    /// Send a request and return its status, headers and gunzipped body.
    ///
    /// Transport failures come back as `Error::Http` or `Error::Timeout`; the
    /// status is not inspected.
    pub async fn fetch(&self, req: RequestBuilder) -> Result<RawResponse> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let response = req.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let headers = response.headers().clone();
        debug!("{} {}", status.as_u16(), response.url().path());

        let raw = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        let body = gunzip(&raw)?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// Send a request and decode a `200` body into `T`
    pub async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let response = self.fetch(req).await?;
        decode_response(response)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            Error::Http(err)
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Classify a response by status and decode its body on success
pub fn decode_response<T: DeserializeOwned>(response: RawResponse) -> Result<T> {
    let status = response.status;

    if status == StatusCode::TOO_MANY_REQUESTS {
        let reset_at = rate_limit_reset(&response.headers, Utc::now());
        warn!("Rate limited until {}", reset_at);
        return Err(Error::RateLimited { reset_at });
    }

    if status == StatusCode::UNAUTHORIZED {
        warn!("Request rejected with 401");
        return Err(Error::Unauthorized);
    }

    if status != StatusCode::OK {
        return Err(Error::http_status(status.as_u16(), status_text(status)));
    }

    Ok(serde_json::from_slice(&response.body)?)
}

/// Decompress a gzip body.
///
/// An empty body stays empty so that body-less error responses can still be
/// classified by status. Anything else that is not gzip fails.
pub fn gunzip(body: &[u8]) -> Result<Vec<u8>> {
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let mut decoded = Vec::with_capacity(body.len() * 4);
    GzDecoder::new(body)
        .read_to_end(&mut decoded)
        .map_err(Error::Gzip)?;
    Ok(decoded)
}

/// Reset instant of a 429 response.
///
/// Falls back to `now + 16 minutes` when the header is absent or not an
/// integer epoch second.
pub fn rate_limit_reset(headers: &HeaderMap, now: DateTime<Utc>) -> DateTime<Utc> {
    headers
        .get(RATE_LIMIT_RESET_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .unwrap_or_else(|| {
            now + chrono::Duration::seconds(DEFAULT_RATE_LIMIT_BACKOFF.as_secs() as i64)
        })
}

/// Status line text, e.g. `404 Not Found`
fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

/// Race a request future against a cancellation signal.
///
/// If `signal` completes first the request future is dropped and
/// `Error::Cancelled` is returned. State owned by the request (such as an
/// iterator's cursor) is only updated after the request completes, so a
/// cancelled call leaves it unchanged.
pub async fn cancellable<T, F, S>(request: F, signal: S) -> Result<T>
where
    F: Future<Output = Result<T>>,
    S: Future<Output = ()>,
{
    tokio::select! {
        biased;
        () = signal => Err(Error::Cancelled),
        result = request => result,
    }
}
