use crate::allow_list::AuthorAllowList;
use crate::filter::FilterConfig;
use crate::types::{FetchConfig, FilterError, OutputFormat, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::env;
use tracing::warn;
use url::Url;

/// Environment variable holding the newline separated author allow-list.
pub const ALLOWED_AUTHOR_LIST_VAR: &str = "ALLOWED_AUTHOR_LIST";

pub const DEFAULT_MAX_ITEMS: usize = 1000;

/// Filter an RSS feed and optionally merge it into a previously published one.
#[derive(Debug, Clone, Parser)]
#[command(name = "rss-filter", version)]
pub struct Cli {
    /// RSS feed URL (required)
    #[arg(long)]
    pub feed: Option<String>,

    /// Number of days to look back (0 or less = no limit)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub since: i64,

    /// Keep only authors listed in the ALLOWED_AUTHOR_LIST environment variable
    #[arg(long)]
    pub authors: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Rss)]
    pub format: OutputFormat,

    /// URL of an already published feed to merge with
    #[arg(long = "merge-existing")]
    pub merge_existing: Option<String>,

    /// Maximum number of items to keep in the merged feed
    #[arg(long = "max-items", default_value_t = DEFAULT_MAX_ITEMS)]
    pub max_items: usize,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub feed_url: String,
    pub archive_url: Option<String>,
    pub since_days: i64,
    pub allow_list: Option<AuthorAllowList>,
    pub format: OutputFormat,
    pub max_items: usize,
    pub fetch: FetchConfig,
}

impl RunConfig {
    /// Defaults for everything but the feed address.
    pub fn new(feed_url: impl Into<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
            archive_url: None,
            since_days: 0,
            allow_list: None,
            format: OutputFormat::default(),
            max_items: DEFAULT_MAX_ITEMS,
            fetch: FetchConfig::default(),
        }
    }

    /// Build from parsed arguments, reading the allow-list from the process
    /// environment.
    pub fn from_env(cli: Cli) -> Result<Self> {
        Self::from_cli(cli, env::var(ALLOWED_AUTHOR_LIST_VAR).ok())
    }

    /// Build from parsed arguments and the raw allow-list text, if any.
    pub fn from_cli(cli: Cli, allow_list_blob: Option<String>) -> Result<Self> {
        let feed_url = match cli.feed {
            Some(feed) if !feed.trim().is_empty() => feed.trim().to_string(),
            _ => return Err(FilterError::Config("--feed parameter is required".to_string())),
        };
        Url::parse(&feed_url)?;

        let archive_url = match cli.merge_existing {
            Some(url) if !url.trim().is_empty() => {
                let url = url.trim().to_string();
                Url::parse(&url)?;
                Some(url)
            }
            _ => None,
        };

        if cli.max_items == 0 {
            return Err(FilterError::Config("--max-items must be at least 1".to_string()));
        }

        let allow_list = if cli.authors {
            let blob = allow_list_blob.filter(|blob| !blob.is_empty()).ok_or_else(|| {
                FilterError::Config(format!(
                    "--authors flag requires {} environment variable to be set",
                    ALLOWED_AUTHOR_LIST_VAR
                ))
            })?;

            let allow_list = AuthorAllowList::parse(&blob);
            if allow_list.is_empty() {
                warn!("{} lists no authors; every entry will be dropped", ALLOWED_AUTHOR_LIST_VAR);
            }
            Some(allow_list)
        } else {
            None
        };

        Ok(Self {
            feed_url,
            archive_url,
            since_days: cli.since,
            allow_list,
            format: cli.format,
            max_items: cli.max_items,
            fetch: FetchConfig {
                timeout_seconds: cli.timeout,
                ..FetchConfig::default()
            },
        })
    }

    /// Inclusion settings relative to `now`.
    pub fn filter_config(&self, now: DateTime<Utc>) -> FilterConfig {
        FilterConfig {
            cutoff: FilterConfig::cutoff_for(now, self.since_days),
            allow_list: self.allow_list.clone(),
        }
    }
}
