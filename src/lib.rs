// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # twitter-graph
//!
//! An async client for the Twitter REST API (v1.1) using application-only
//! authentication.
//!
//! ## Features
//!
//! - **App-only auth**: OAuth2 client-credentials exchange for a bearer token
//! - **Lookups**: user profiles and timelines by id or screen name
//! - **Cursor pagination**: follower and friend id lists, one page per call
//! - **Typed errors**: rate limits carry their reset instant, end of list is
//!   its own variant
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use twitter_graph::{Client, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut client = Client::new("consumer-key", "consumer-secret")?;
//!     client.authenticate().await?;
//!
//!     let profile = client.get_profile("jack").await?;
//!     println!("{} has {} followers", profile.screen_name, profile.followers_count);
//!
//!     let mut followers = client.followers_iter(profile.id, 5000);
//!     let mut ids = Vec::new();
//!     loop {
//!         match followers.next(&mut ids).await {
//!             Ok(()) => println!("{} ids", ids.len()),
//!             Err(e) if e.is_end_of_list() => break,
//!             Err(e) => return Err(e),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                         Client                          │
//! │  authenticate()   get_profile()   get_timeline()        │
//! │  followers_iter() / friends_iter() → CursorIterator     │
//! └─────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──────────┬─────────────────┐
//! │     Auth     │          HTTP          │   Pagination    │
//! ├──────────────┼────────────────────────┼─────────────────┤
//! │ Basic → token│ Bearer + gzip          │ cursor -1 → 0   │
//! │              │ 429 / 401 / status     │ retry-safe next │
//! │              │ optional pacing        │ stream adapter  │
//! └──────────────┴────────────────────────┴─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types, API limits and `Subject`
pub mod types;

/// API date format codec
pub mod date;

/// Decoded API records
pub mod model;

/// Application-only authentication
pub mod auth;

/// Request executor and client-side pacing
pub mod http;

/// Cursor pagination
pub mod pagination;

/// API client
pub mod client;

/// Client configuration and settings files
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::Client;
pub use config::{ClientConfig, Settings};
pub use error::{Error, Result};
pub use model::{IdPage, Post, Profile};
pub use pagination::{CursorIterator, FollowersIterator, FriendsIterator};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
