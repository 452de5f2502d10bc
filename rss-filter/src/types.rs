use clap::ValueEnum;
use std::fmt;
// Use the interfaces crate for core types
pub use interfaces::defs::Entry;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("rss-filter/{}", env!("CARGO_PKG_VERSION")),
            timeout_seconds: 30,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// What a retrieval produced when the transport itself worked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(String),
    /// The server answered 404: the document does not exist (yet).
    NotFound,
}

#[derive(Debug, Default)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Rss,
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Rss => f.write_str("rss"),
            OutputFormat::Markdown => f.write_str("markdown"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterError {
    /// Process exit status for a run that failed with this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            FilterError::Config(_) | FilterError::InvalidUrl(_) => 2,
            FilterError::Http(_) => 3,
            FilterError::Status { .. } | FilterError::FeedTooLarge { .. } => 4,
            FilterError::Parse(_) => 5,
            FilterError::Io(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
