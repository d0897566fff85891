//! Pagination types and traits
//!
//! Defines the cursor state and the endpoint abstraction shared by the
//! followers and friends id lists.

use crate::error::{Error, Result};
use crate::model::IdPage;
use crate::types::{Subject, CURSOR_END, CURSOR_START, MAX_FOLLOWERS_COUNT, MAX_FRIENDS_COUNT};
use serde::de::DeserializeOwned;
use url::Url;

/// A decoded page of a cursored list
pub trait CursorPage: DeserializeOwned {
    /// Cursor of the following page, `0` after the last one
    fn next_cursor(&self) -> i64;

    /// Cursor of the preceding page, `0` on the first one
    fn previous_cursor(&self) -> i64;

    /// The ids carried by this page, in server order
    fn into_ids(self) -> Vec<i64>;
}

impl CursorPage for IdPage {
    fn next_cursor(&self) -> i64 {
        self.next_cursor
    }

    fn previous_cursor(&self) -> i64 {
        self.previous_cursor
    }

    fn into_ids(self) -> Vec<i64> {
        self.ids
    }
}

/// A cursor-paged endpoint: where it lives and what its pages look like
pub trait CursorEndpoint {
    /// Path below the API root, e.g. `followers/ids.json`
    const PATH: &'static str;

    /// Largest page size the endpoint accepts
    const MAX_COUNT: u32;

    /// Page shape
    type Page: CursorPage;
}

/// `GET followers/ids`
#[derive(Debug, Clone, Copy)]
pub struct Followers;

impl CursorEndpoint for Followers {
    const PATH: &'static str = "followers/ids.json";
    const MAX_COUNT: u32 = MAX_FOLLOWERS_COUNT;
    type Page = IdPage;
}

/// `GET friends/ids`
#[derive(Debug, Clone, Copy)]
pub struct Friends;

impl CursorEndpoint for Friends {
    const PATH: &'static str = "friends/ids.json";
    const MAX_COUNT: u32 = MAX_FRIENDS_COUNT;
    type Page = IdPage;
}

/// Position of one iterator inside a cursored list.
///
/// Starts at `-1`, follows the server's `next_cursor` after every successful
/// page and is exhausted once that cursor is `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorState {
    subject: Subject,
    page_size: u32,
    cursor: i64,
    previous_cursor: i64,
    pages_fetched: u64,
}

impl CursorState {
    /// Create a state positioned before the first page
    pub fn new(subject: Subject, page_size: u32) -> Self {
        Self {
            subject,
            page_size,
            cursor: CURSOR_START,
            previous_cursor: CURSOR_END,
            pages_fetched: 0,
        }
    }

    /// The account whose list is walked
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Requested page size
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Cursor the next request will send
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Previous cursor reported by the last fetched page
    pub fn previous_cursor(&self) -> i64 {
        self.previous_cursor
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    /// True once the server has reported the last page
    pub fn is_exhausted(&self) -> bool {
        self.cursor == CURSOR_END
    }

    /// URL of the page at the current cursor.
    ///
    /// Query order is `count`, `cursor`, then the subject (`user_id` wins over
    /// `screen_name`).
    pub fn page_url(&self, base_url: &str, path: &str) -> Result<Url> {
        if self.is_exhausted() {
            return Err(Error::EndOfList);
        }
        let (key, value) = self.subject.query_pair()?;
        let mut url = endpoint_url(base_url, path)?;
        url.query_pairs_mut()
            .append_pair("count", &self.page_size.to_string())
            .append_pair("cursor", &self.cursor.to_string())
            .append_pair(key, &value);
        Ok(url)
    }

    /// Move past a successfully fetched page
    pub fn advance(&mut self, next_cursor: i64, previous_cursor: i64) {
        self.cursor = next_cursor;
        self.previous_cursor = previous_cursor;
        self.pages_fetched += 1;
    }
}

/// Join an API root and an endpoint path
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> Result<Url> {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{base}/{path}"))?)
}
