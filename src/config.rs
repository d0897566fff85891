//! Configuration
//!
//! `ClientConfig` is what a `Client` is built from. `Settings` is the on-disk
//! and environment form of the same values plus the consumer credentials,
//! loaded from YAML:
//!
//! ```yaml
//! consumer_key: your-consumer-key
//! consumer_secret: your-consumer-secret
//! timeout_secs: 10
//! rate_limit:
//!   max_requests: 15
//!   window: 900
//! ```
//!
//! Environment variables override the file: `TWITTER_CONSUMER_KEY`,
//! `TWITTER_CONSUMER_SECRET`, `TWITTER_API_BASE_URL`, `TWITTER_AUTH_URL`.

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default REST API root
pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com/1.1";

/// Default token endpoint
pub const DEFAULT_AUTH_URL: &str = "https://api.twitter.com/oauth2/token";

pub const ENV_CONSUMER_KEY: &str = "TWITTER_CONSUMER_KEY";
pub const ENV_CONSUMER_SECRET: &str = "TWITTER_CONSUMER_SECRET";
pub const ENV_BASE_URL: &str = "TWITTER_API_BASE_URL";
pub const ENV_AUTH_URL: &str = "TWITTER_AUTH_URL";

// ============================================================================
// Client Config
// ============================================================================

/// Endpoints and transport settings of a `Client`
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API root, e.g. `https://api.twitter.com/1.1`
    pub base_url: String,
    /// Token endpoint
    pub auth_url: String,
    /// Transport settings
    pub http: HttpClientConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            http: HttpClientConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the REST API root
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the token endpoint
    pub fn auth_url(mut self, url: impl Into<String>) -> Self {
        self.config.auth_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.http.timeout = timeout;
        self
    }

    /// Pace requests on the client side.
    ///
    /// One bucket covers every request the client sends, token exchange
    /// included.
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.http.rate_limit = Some(config);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.http.user_agent = agent.into();
        self
    }

    /// Replace the transport settings wholesale
    pub fn http(mut self, http: HttpClientConfig) -> Self {
        self.config.http = http;
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Settings file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub base_url: Option<String>,
    pub auth_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Settings {
    /// Parse settings from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read settings from a YAML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_lookup(path, |name| std::env::var(name).ok())
    }

    /// Read settings from a YAML file, then apply overrides from `lookup`
    pub fn load_with_lookup(
        path: impl AsRef<Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::from_yaml_str(&content)?.with_lookup(lookup))
    }

    /// Settings taken from the environment only
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Apply environment overrides
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_lookup(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    #[must_use]
    pub fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        if let Some(v) = get(ENV_CONSUMER_KEY) {
            self.consumer_key = Some(v);
        }
        if let Some(v) = get(ENV_CONSUMER_SECRET) {
            self.consumer_secret = Some(v);
        }
        if let Some(v) = get(ENV_BASE_URL) {
            self.base_url = Some(v);
        }
        if let Some(v) = get(ENV_AUTH_URL) {
            self.auth_url = Some(v);
        }
        self
    }

    /// Consumer credentials, failing if either half is missing
    pub fn credentials(&self) -> Result<Credentials> {
        let key = self
            .consumer_key
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::missing_field("consumer_key"))?;
        let secret = self
            .consumer_secret
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::missing_field("consumer_secret"))?;
        Ok(Credentials::new(key, secret))
    }

    /// Client config with defaults for everything left unset
    pub fn client_config(&self) -> ClientConfig {
        let mut builder = ClientConfig::builder();
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url.clone());
        }
        if let Some(url) = &self.auth_url {
            builder = builder.auth_url(url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        if let Some(rate_limit) = self.rate_limit {
            builder = builder.rate_limit(rate_limit);
        }
        builder.build()
    }
}
