//! Cursor iterator
//!
//! Walks a cursor-paged id list one page per call. The caller drives it:
//!
//! ```no_run
//! # async fn walk(client: &twitter_graph::Client) -> twitter_graph::Result<()> {
//! let mut followers = client.followers_iter("jack", 5000);
//! let mut ids = Vec::new();
//! loop {
//!     match followers.next(&mut ids).await {
//!         Ok(()) => println!("{} ids", ids.len()),
//!         Err(e) if e.is_end_of_list() => break,
//!         Err(e) => return Err(e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use super::types::{CursorEndpoint, CursorPage, CursorState, Followers, Friends};
use crate::client::Client;
use crate::error::{Error, Result};
use crate::types::Subject;
use futures::stream::{self, Stream};
use std::marker::PhantomData;
use tracing::debug;

/// Stateful iterator over one cursored endpoint.
///
/// Borrows the client; owns its cursor. Not reentrant: `next` takes
/// `&mut self`, so calls on one iterator are serialized by construction.
pub struct CursorIterator<'a, E: CursorEndpoint> {
    client: &'a Client,
    state: CursorState,
    _endpoint: PhantomData<E>,
}

/// Iterator over `followers/ids`
pub type FollowersIterator<'a> = CursorIterator<'a, Followers>;

/// Iterator over `friends/ids`
pub type FriendsIterator<'a> = CursorIterator<'a, Friends>;

impl<'a, E: CursorEndpoint> CursorIterator<'a, E> {
    /// Create an iterator positioned before the first page.
    ///
    /// `page_size` is clamped to `1..=E::MAX_COUNT`.
    pub fn new(client: &'a Client, subject: Subject, page_size: u32) -> Self {
        let clamped = page_size.clamp(1, E::MAX_COUNT);
        if clamped != page_size {
            debug!("Page size {} for {} clamped to {}", page_size, E::PATH, clamped);
        }

        Self {
            client,
            state: CursorState::new(subject, clamped),
            _endpoint: PhantomData,
        }
    }

    /// Fetch the next page into `out`.
    ///
    /// On success `out` is replaced with the page's ids and the cursor moves
    /// to the server's `next_cursor`. On failure both are left untouched, so
    /// calling again retries the same page. Once the list is exhausted every
    /// call returns `Error::EndOfList` without touching the network.
    pub async fn next(&mut self, out: &mut Vec<i64>) -> Result<()> {
        let url = self.state.page_url(self.client.base_url(), E::PATH)?;
        debug!(
            "Fetching {} page {} (cursor {})",
            E::PATH,
            self.state.pages_fetched() + 1,
            self.state.cursor()
        );

        let page: E::Page = self.client.fetch_json(url).await?;

        self.state.advance(page.next_cursor(), page.previous_cursor());
        *out = page.into_ids();

        if self.state.is_exhausted() {
            debug!(
                "{} exhausted after {} pages",
                E::PATH,
                self.state.pages_fetched()
            );
        }
        Ok(())
    }

    /// Fetch the next page and return its ids
    pub async fn next_ids(&mut self) -> Result<Vec<i64>> {
        let mut ids = Vec::new();
        self.next(&mut ids).await?;
        Ok(ids)
    }

    /// Cursor the next request will send
    pub fn cursor(&self) -> i64 {
        self.state.cursor()
    }

    /// Previous cursor reported by the last fetched page
    pub fn previous_cursor(&self) -> i64 {
        self.state.previous_cursor()
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.is_exhausted()
    }

    pub fn subject(&self) -> &Subject {
        self.state.subject()
    }

    pub fn page_size(&self) -> u32 {
        self.state.page_size()
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> u64 {
        self.state.pages_fetched()
    }

    /// Turn the iterator into a stream of pages.
    ///
    /// The stream ends cleanly at the end of the list. Any other error is
    /// yielded once and then the stream ends.
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<i64>>> + 'a
    where
        E: 'a,
    {
        stream::unfold(Some(self), |iter| async move {
            let mut iter = iter?;
            match iter.next_ids().await {
                Ok(ids) => Some((Ok(ids), Some(iter))),
                Err(Error::EndOfList) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}

impl<E: CursorEndpoint> std::fmt::Debug for CursorIterator<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorIterator")
            .field("endpoint", &E::PATH)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
