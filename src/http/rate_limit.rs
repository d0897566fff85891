//! Client-side request pacing
//!
//! Uses the governor crate for token bucket rate limiting. The API enforces
//! its limits per 15 minute window. Pacing only delays requests, it never
//! retries them.
//!
//! An `HttpClient` holds a single bucket, so every request it sends draws
//! from the same budget, the token exchange included. Size the budget for
//! the strictest endpoint you call, usually [`RateLimiterConfig::id_lists`].

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Length of the API's rate limit window
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Configuration for rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Requests allowed per window
    pub max_requests: u32,
    /// Window length
    #[serde(with = "window_secs")]
    pub window: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::id_lists()
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    /// Budget of `followers/ids` and `friends/ids` (15 per window)
    pub fn id_lists() -> Self {
        Self::new(15, RATE_LIMIT_WINDOW)
    }

    /// Budget of `users/show` with app-only auth (900 per window)
    pub fn user_lookup() -> Self {
        Self::new(900, RATE_LIMIT_WINDOW)
    }

    /// Budget of `statuses/user_timeline` with app-only auth (1500 per window)
    pub fn timeline() -> Self {
        Self::new(1500, RATE_LIMIT_WINDOW)
    }

    /// Replenish interval of a single permit
    pub fn period(&self) -> Duration {
        self.window / self.max_requests.max(1)
    }
}

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config.
    ///
    /// The whole window budget is available as an initial burst.
    pub fn new(config: &RateLimiterConfig) -> Self {
        let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(config.period())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }

    /// Wait with a timeout
    pub async fn wait_with_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.limiter.until_ready())
            .await
            .is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}

mod window_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
