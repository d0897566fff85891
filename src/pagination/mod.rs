//! Pagination module
//!
//! Cursored id lists (`followers/ids`, `friends/ids`).
//!
//! # Overview
//!
//! A list is walked with a cursor that starts at `-1` and is replaced by the
//! server's `next_cursor` after each page; `0` marks the end. One generic
//! iterator implements this protocol and is parametrized by a
//! `CursorEndpoint` that supplies the path and page shape.

mod iterator;
mod types;

pub use iterator::{CursorIterator, FollowersIterator, FriendsIterator};
pub use types::{CursorEndpoint, CursorPage, CursorState, Followers, Friends};

pub(crate) use types::endpoint_url;
