//! API client
//!
//! `Client` holds the consumer credentials, the bearer token once obtained,
//! and the transport. Single-shot lookups live here; id lists are walked
//! through the iterators it hands out.
//!
//! ```no_run
//! use twitter_graph::Client;
//!
//! # async fn run() -> twitter_graph::Result<()> {
//! let mut client = Client::new("consumer-key", "consumer-secret")?;
//! client.authenticate().await?;
//!
//! let profile = client.get_profile("jack").await?;
//! let posts = client.get_timeline(profile.id, 20).await?;
//! # Ok(())
//! # }
//! ```

use crate::auth::{BearerToken, Credentials, TokenProvider};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::model::{Post, Profile};
use crate::pagination::{endpoint_url, FollowersIterator, FriendsIterator};
use crate::types::Subject;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

const PROFILE_PATH: &str = "users/show.json";
const TIMELINE_PATH: &str = "statuses/user_timeline.json";

/// Application-only API client
#[derive(Debug)]
pub struct Client {
    credentials: Credentials,
    base_url: String,
    http: HttpClient,
    token_provider: TokenProvider,
    token: Option<BearerToken>,
}

impl Client {
    /// Create a client with default endpoints. Does not authenticate.
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Result<Self> {
        Self::with_config(
            Credentials::new(consumer_key, consumer_secret),
            ClientConfig::default(),
        )
    }

    /// Create a client with custom endpoints and transport settings
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        // Validate both roots up front so later joins cannot fail on them
        Url::parse(&config.base_url)?;
        let token_url = Url::parse(&config.auth_url)?;

        let http = HttpClient::with_config(config.http)?;

        Ok(Self {
            credentials,
            base_url: config.base_url,
            http,
            token_provider: TokenProvider::new(token_url),
            token: None,
        })
    }

    /// Use an already issued bearer token instead of authenticating
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(BearerToken::new(token));
        self
    }

    /// Exchange the consumer credentials for a bearer token.
    ///
    /// The token is stored only on success; a failed attempt leaves the client
    /// as it was.
    pub async fn authenticate(&mut self) -> Result<()> {
        let token = self
            .token_provider
            .authenticate(&self.http, &self.credentials)
            .await?;
        self.token = Some(token);
        info!("Authenticated against {}", self.token_provider.token_url());
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The current bearer token, if any
    pub fn bearer_token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Look up a user profile by id or screen name
    pub async fn get_profile(&self, subject: impl Into<Subject>) -> Result<Profile> {
        let subject = subject.into();
        let (key, value) = subject.query_pair()?;

        let mut url = endpoint_url(&self.base_url, PROFILE_PATH)?;
        url.query_pairs_mut().append_pair(key, &value);

        self.fetch_json(url).await
    }

    pub async fn get_profile_by_id(&self, user_id: i64) -> Result<Profile> {
        self.get_profile(Subject::id(user_id)).await
    }

    /// Fetch up to `count` of the most recent posts of a user
    pub async fn get_timeline(&self, subject: impl Into<Subject>, count: u32) -> Result<Vec<Post>> {
        let subject = subject.into();
        let (key, value) = subject.query_pair()?;

        let mut url = endpoint_url(&self.base_url, TIMELINE_PATH)?;
        url.query_pairs_mut()
            .append_pair(key, &value)
            .append_pair("count", &count.to_string());

        self.fetch_json(url).await
    }

    pub async fn get_timeline_by_id(&self, user_id: i64, count: u32) -> Result<Vec<Post>> {
        self.get_timeline(Subject::id(user_id), count).await
    }

    /// Iterator over the follower ids of `subject`, starting at the first page
    pub fn followers_iter(&self, subject: impl Into<Subject>, page_size: u32) -> FollowersIterator<'_> {
        FollowersIterator::new(self, subject.into(), page_size)
    }

    /// Iterator over the ids `subject` follows, starting at the first page
    pub fn friends_iter(&self, subject: impl Into<Subject>, page_size: u32) -> FriendsIterator<'_> {
        FriendsIterator::new(self, subject.into(), page_size)
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `url` with the bearer token and decode the response.
    ///
    /// Fails with `Error::NotAuthenticated` before any network call when no
    /// token is held.
    pub(crate) async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let token = self.token.as_ref().ok_or(Error::NotAuthenticated)?;
        debug!("GET {}", url.path());
        let req = self.http.prepare(Method::GET, url, token);
        self.http.execute(req).await
    }
}
