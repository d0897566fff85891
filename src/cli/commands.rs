//! CLI commands and argument parsing

use crate::types::{Subject, MAX_FOLLOWERS_COUNT, MAX_TIMELINE_COUNT};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Query profiles, timelines and the follower graph of Twitter accounts
#[derive(Parser, Debug)]
#[command(name = "twitter-graph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML). Credentials may also come from
    /// TWITTER_CONSUMER_KEY / TWITTER_CONSUMER_SECRET
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a user profile
    Profile {
        /// User id (digits) or screen name
        #[arg(value_parser = parse_subject)]
        subject: Subject,
    },

    /// Show the most recent posts of a user
    Timeline {
        /// User id (digits) or screen name
        #[arg(value_parser = parse_subject)]
        subject: Subject,

        /// Number of posts
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=MAX_TIMELINE_COUNT as i64))]
        count: u32,
    },

    /// List the ids of the accounts following a user
    Followers(ListArgs),

    /// List the ids of the accounts a user follows
    Friends(ListArgs),
}

/// Arguments shared by the id list commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// User id (digits) or screen name
    #[arg(value_parser = parse_subject)]
    pub subject: Subject,

    /// Ids per page
    #[arg(long, default_value_t = MAX_FOLLOWERS_COUNT, value_parser = clap::value_parser!(u32).range(1..=MAX_FOLLOWERS_COUNT as i64))]
    pub page_size: u32,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<u64>,

    /// Sleep until the rate limit window resets instead of failing
    #[arg(long)]
    pub wait_on_rate_limit: bool,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

fn parse_subject(input: &str) -> std::result::Result<Subject, String> {
    Subject::parse(input).map_err(|e| e.to_string())
}
