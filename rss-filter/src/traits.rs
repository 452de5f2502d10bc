use crate::types::{FetchOutcome, Result};
use async_trait::async_trait;

/// Anything that can hand over the raw text of a feed document.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Retrieve the document at `url`.
    ///
    /// A document that doesn't exist is `Ok(FetchOutcome::NotFound)`, not an
    /// error; whether that is fatal is up to the caller.
    async fn fetch(&self, url: &str) -> Result<FetchOutcome>;
}
