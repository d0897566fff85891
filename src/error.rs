//! Error types for twitter-graph
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! `EndOfList` is not a failure: it is the terminal signal of a cursor
//! iterator and callers should match on it to leave their pagination loop.

use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// The main error type for twitter-graph
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Token response has no string 'access_token' field")]
    MissingAccessToken,

    #[error("Client is not authenticated")]
    NotAuthenticated,

    #[error("Authorization Required")]
    Unauthorized,

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Request cancelled")]
    Cancelled,

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("Too Many Requests (resets at {reset_at})")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("{text}")]
    HttpStatus { status: u16, text: String },

    #[error("Failed to decompress response: {0}")]
    Gzip(#[source] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // Pagination
    // ============================================================================
    #[error("No more remaining pages")]
    EndOfList,

    #[error("Subject needs a user id or a screen name")]
    InvalidSubject,

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a generic status error from a status code and its text
    pub fn http_status(status: u16, text: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            text: text.into(),
        }
    }

    /// True for the iterator's terminal signal
    pub fn is_end_of_list(&self) -> bool {
        matches!(self, Error::EndOfList)
    }

    /// True when the response body could not be decompressed or parsed
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Gzip(_) | Error::Json(_))
    }

    /// Check if this error is worth retrying (after waiting, for rate limits)
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. }
        )
    }

    /// Reset instant carried by a rate limit error
    pub fn rate_limit_reset(&self) -> Option<DateTime<Utc>> {
        match self {
            Error::RateLimited { reset_at } => Some(*reset_at),
            _ => None,
        }
    }

    /// How long to wait before retrying a rate limited call.
    ///
    /// Zero when the reset instant is already in the past.
    pub fn retry_after(&self) -> Option<Duration> {
        self.rate_limit_reset()
            .map(|reset_at| (reset_at - Utc::now()).to_std().unwrap_or(Duration::ZERO))
    }
}

/// Result type alias for twitter-graph
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }
}
