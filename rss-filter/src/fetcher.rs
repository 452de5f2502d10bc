use crate::traits::FeedSource;
use crate::types::{FetchConfig, FetchOutcome, FilterError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const BYTES_PER_MB: usize = 1024 * 1024;

/// HTTP retrieval of feed documents.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<FetchOutcome> {
        let start_time = Instant::now();
        debug!("Fetching feed: {}", url);

        let mut response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            info!("Feed does not exist: {}", url);
            return Ok(FetchOutcome::NotFound);
        }

        if status != StatusCode::OK {
            warn!("Unexpected status {} from {}", status, url);
            return Err(FilterError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let limit = self.config.max_feed_size_mb.saturating_mul(BYTES_PER_MB);

        // Reject early when the size is declared up front
        if let Some(content_length) = response.content_length() {
            let content_length = usize::try_from(content_length).unwrap_or(usize::MAX);
            if content_length > limit {
                return Err(FilterError::FeedTooLarge {
                    size_mb: size_in_mb(content_length),
                });
            }
        }

        // Chunked and compressed bodies carry no usable length, so the limit
        // is enforced on the decoded bytes as they arrive
        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let received = body.len() + chunk.len();
            if received > limit {
                warn!("Feed {} exceeded {} bytes, aborting download", url, limit);
                return Err(FilterError::FeedTooLarge {
                    size_mb: size_in_mb(received),
                });
            }
            body.extend_from_slice(&chunk);
        }

        let content = String::from_utf8_lossy(&body).into_owned();
        info!(
            "Successfully fetched feed: {} ({} bytes in {} ms)",
            url,
            content.len(),
            start_time.elapsed().as_millis()
        );

        Ok(FetchOutcome::Found(content))
    }
}

#[async_trait]
impl FeedSource for Fetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        self.fetch_feed(url).await
    }
}

/// Whole megabytes, rounded up so anything over the limit reports above it.
fn size_in_mb(bytes: usize) -> usize {
    bytes.div_ceil(BYTES_PER_MB)
}
