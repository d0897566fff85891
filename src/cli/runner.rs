//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, ListArgs, OutputFormat};
use crate::client::Client;
use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use crate::pagination::{CursorEndpoint, CursorIterator};
use crate::types::Subject;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, info, warn};

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// CLI runner
pub struct Runner {
    cli: Cli,
    lookup: Lookup,
}

impl Runner {
    /// Create a runner that reads overrides from the process environment
    pub fn new(cli: Cli) -> Self {
        Self::with_lookup(cli, |name| std::env::var(name).ok())
    }

    /// Create a runner that reads overrides from `lookup` instead of the
    /// process environment
    pub fn with_lookup(
        cli: Cli,
        lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            cli,
            lookup: Box::new(lookup),
        }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let settings = self.load_settings()?;
        let credentials = settings.credentials()?;
        let mut client = Client::with_config(credentials, settings.client_config())?;

        client.authenticate().await.context("Authentication failed")?;

        match &self.cli.command {
            Commands::Profile { subject } => self.profile(&client, subject).await,
            Commands::Timeline { subject, count } => self.timeline(&client, subject, *count).await,
            Commands::Followers(args) => {
                let iter = client.followers_iter(args.subject.clone(), args.page_size);
                self.walk(iter, args, "followers").await
            }
            Commands::Friends(args) => {
                let iter = client.friends_iter(args.subject.clone(), args.page_size);
                self.walk(iter, args, "friends").await
            }
        }
    }

    /// Load settings from the config file if given, then apply overrides
    fn load_settings(&self) -> Result<Settings> {
        let lookup = |name: &str| (self.lookup)(name);
        match &self.cli.config {
            Some(path) => {
                debug!("Loading settings from {}", path.display());
                Settings::load_with_lookup(path, lookup)
            }
            None => Ok(Settings::default().with_lookup(lookup)),
        }
    }

    async fn profile(&self, client: &Client, subject: &Subject) -> Result<()> {
        let profile = client.get_profile(subject.clone()).await?;
        self.output_message(&json!({
            "type": "PROFILE",
            "profile": profile
        }));
        Ok(())
    }

    async fn timeline(&self, client: &Client, subject: &Subject, count: u32) -> Result<()> {
        let posts = client.get_timeline(subject.clone(), count).await?;
        info!("Fetched {} posts for {}", posts.len(), subject);
        for post in posts {
            self.output_message(&json!({
                "type": "POST",
                "subject": subject.to_string(),
                "post": post
            }));
        }
        Ok(())
    }

    /// Drain an id list page by page, one message per page
    async fn walk<E: CursorEndpoint>(
        &self,
        mut iter: CursorIterator<'_, E>,
        args: &ListArgs,
        list: &str,
    ) -> Result<()> {
        let start = Instant::now();
        let mut ids = Vec::new();
        let mut total = 0usize;

        loop {
            if args.max_pages.is_some_and(|max| iter.pages_fetched() >= max) {
                info!("Stopping {} after {} pages", list, iter.pages_fetched());
                break;
            }

            match iter.next(&mut ids).await {
                Ok(()) => {
                    total += ids.len();
                    self.output_message(&json!({
                        "type": "IDS",
                        "list": list,
                        "subject": args.subject.to_string(),
                        "page": iter.pages_fetched(),
                        "next_cursor": iter.cursor(),
                        "ids": ids
                    }));
                }
                Err(Error::EndOfList) => break,
                Err(e @ Error::RateLimited { .. }) if args.wait_on_rate_limit => {
                    let wait = e.retry_after().unwrap_or_default();
                    warn!(
                        "{} rate limited at cursor {}, sleeping {}s",
                        list,
                        iter.cursor(),
                        wait.as_secs()
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Fetched {} {} ids in {} pages ({}ms)",
            total,
            list,
            iter.pages_fetched(),
            start.elapsed().as_millis()
        );
        self.output_message(&json!({
            "type": "SUMMARY",
            "list": list,
            "subject": args.subject.to_string(),
            "pages": iter.pages_fetched(),
            "ids": total,
            "complete": iter.is_exhausted()
        }));
        Ok(())
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
