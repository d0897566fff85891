//! CLI module
//!
//! Command-line interface over the API client.
//!
//! # Commands
//!
//! - `profile` - Show a user profile
//! - `timeline` - Show recent posts of a user
//! - `followers` - Page through follower ids
//! - `friends` - Page through followed ids

mod commands;
mod runner;

pub use commands::{Cli, Commands, ListArgs, OutputFormat};
pub use runner::Runner;
