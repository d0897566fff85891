//! Authentication module
//!
//! Application-only authentication: the consumer key and secret are exchanged
//! for a bearer token through the OAuth2 client-credentials grant. The token
//! does not expire on its own and is never refreshed by this crate.

mod provider;
mod types;

pub use provider::{basic_credentials, TokenProvider, GRANT_TYPE_BODY};
pub use types::{BearerToken, Credentials};
