//! Common types used throughout twitter-graph
//!
//! This module contains shared type definitions, API limits,
//! and the `Subject` used to address an account.

use crate::error::{Error, Result};
use std::fmt;

// ============================================================================
// API Limits
// ============================================================================

/// Largest page size accepted by `followers/ids`
pub const MAX_FOLLOWERS_COUNT: u32 = 5000;

/// Largest page size accepted by `friends/ids`
pub const MAX_FRIENDS_COUNT: u32 = 5000;

/// Largest `count` accepted by `statuses/user_timeline`
pub const MAX_TIMELINE_COUNT: u32 = 200;

// ============================================================================
// Cursor values
// ============================================================================

/// Cursor value requesting the first page
pub const CURSOR_START: i64 = -1;

/// Cursor value the server returns after the last page
pub const CURSOR_END: i64 = 0;

// ============================================================================
// Subject
// ============================================================================

/// The account a query targets.
///
/// A subject may carry a numeric user id, a screen name, or both. When both are
/// present the user id wins. A user id of `0` means "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subject {
    user_id: Option<i64>,
    screen_name: Option<String>,
}

impl Subject {
    /// Create a subject from both identifiers
    pub fn new(user_id: i64, screen_name: impl Into<String>) -> Self {
        let screen_name = screen_name.into();
        Self {
            user_id: (user_id != 0).then_some(user_id),
            screen_name: (!screen_name.is_empty()).then_some(screen_name),
        }
    }

    /// Subject addressed by numeric user id
    pub fn id(user_id: i64) -> Self {
        Self::new(user_id, "")
    }

    /// Subject addressed by screen name
    pub fn screen_name(screen_name: impl Into<String>) -> Self {
        Self::new(0, screen_name)
    }

    /// Set the user id on an existing subject
    #[must_use]
    pub fn with_id(mut self, user_id: i64) -> Self {
        self.user_id = (user_id != 0).then_some(user_id);
        self
    }

    /// Set the screen name on an existing subject
    #[must_use]
    pub fn with_screen_name(mut self, screen_name: impl Into<String>) -> Self {
        let screen_name = screen_name.into();
        self.screen_name = (!screen_name.is_empty()).then_some(screen_name);
        self
    }

    /// The numeric user id, if set
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    /// The screen name, if set
    pub fn name(&self) -> Option<&str> {
        self.screen_name.as_deref()
    }

    /// The query pair identifying this subject, user id first.
    ///
    /// The value is unescaped; callers append it through a URL serializer.
    pub fn query_pair(&self) -> Result<(&'static str, String)> {
        match (self.user_id, self.screen_name.as_deref()) {
            (Some(id), _) => Ok(("user_id", id.to_string())),
            (None, Some(name)) => Ok(("screen_name", name.to_string())),
            (None, None) => Err(Error::InvalidSubject),
        }
    }

    /// Parse a command-line style subject: digits are an id, anything else
    /// is a screen name with an optional leading `@`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::InvalidSubject);
        }
        if input.bytes().all(|b| b.is_ascii_digit()) {
            let id: i64 = input
                .parse()
                .map_err(|_| Error::config(format!("User id out of range: {input}")))?;
            if id == 0 {
                return Err(Error::InvalidSubject);
            }
            return Ok(Self::id(id));
        }
        let name = input.strip_prefix('@').unwrap_or(input);
        if name.is_empty() {
            return Err(Error::InvalidSubject);
        }
        Ok(Self::screen_name(name))
    }
}

impl From<i64> for Subject {
    fn from(user_id: i64) -> Self {
        Self::id(user_id)
    }
}

impl From<&str> for Subject {
    fn from(screen_name: &str) -> Self {
        Self::screen_name(screen_name)
    }
}

impl From<String> for Subject {
    fn from(screen_name: String) -> Self {
        Self::screen_name(screen_name)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.user_id, self.screen_name.as_deref()) {
            (Some(id), _) => write!(f, "{id}"),
            (None, Some(name)) => write!(f, "@{name}"),
            (None, None) => f.write_str("<unset>"),
        }
    }
}
