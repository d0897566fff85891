//! HTTP module
//!
//! Executes authenticated API requests and turns responses into typed values
//! or classified errors.
//!
//! # Features
//!
//! - **Gzip bodies**: every request asks for gzip and every body is gunzipped
//! - **Status classification**: rate limit, unauthorized, other status, success
//! - **Pacing**: optional token bucket rate limiter using governor
//! - **Cancellation**: race any request against a shutdown signal

mod client;
mod rate_limit;

pub use client::{
    cancellable, decode_response, gunzip, rate_limit_reset, HttpClient, HttpClientConfig,
    HttpClientConfigBuilder, RawResponse, DEFAULT_RATE_LIMIT_BACKOFF, RATE_LIMIT_RESET_HEADER,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig, RATE_LIMIT_WINDOW};
