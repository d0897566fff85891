//! Token provider
//!
//! Performs the client-credentials exchange against the token endpoint.

use super::types::{BearerToken, Credentials};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use base64::Engine as _;
use reqwest::header::{ACCEPT_ENCODING, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;
use url::{form_urlencoded, Url};

/// Form body of the token request
pub const GRANT_TYPE_BODY: &str = "grant_type=client_credentials";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// Exchanges consumer credentials for a bearer token
#[derive(Debug, Clone)]
pub struct TokenProvider {
    token_url: Url,
}

impl TokenProvider {
    /// Create a provider for the given token endpoint
    pub fn new(token_url: Url) -> Self {
        Self { token_url }
    }

    /// The token endpoint
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Obtain a bearer token.
    ///
    /// The response status is not inspected: a rejected exchange surfaces as a
    /// body without an `access_token`. Nothing is retried.
    pub async fn authenticate(
        &self,
        http: &HttpClient,
        credentials: &Credentials,
    ) -> Result<BearerToken> {
        debug!("Requesting bearer token from {}", self.token_url);

        let req = http
            .inner()
            .post(self.token_url.clone())
            .header(AUTHORIZATION, format!("Basic {}", basic_credentials(credentials)))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(ACCEPT_ENCODING, "gzip")
            .body(GRANT_TYPE_BODY);

        let response = http.fetch(req).await?;
        let body: Value = serde_json::from_slice(&response.body)?;

        let token = body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or(Error::MissingAccessToken)?;

        debug!("Bearer token obtained (status {})", response.status.as_u16());
        Ok(BearerToken::new(token))
    }
}

/// `base64(escape(key):escape(secret))` as used in the Basic header.
///
/// Key and secret are form-escaped before joining, so a `:` inside either
/// cannot split the pair. Escaping is `application/x-www-form-urlencoded`:
/// `*` is left as-is and `~` becomes `%7E`, unlike Go's `QueryEscape`.
pub fn basic_credentials(credentials: &Credentials) -> String {
    let key: String =
        form_urlencoded::byte_serialize(credentials.consumer_key().as_bytes()).collect();
    let secret: String =
        form_urlencoded::byte_serialize(credentials.consumer_secret().as_bytes()).collect();
    base64::engine::general_purpose::STANDARD.encode(format!("{key}:{secret}"))
}
