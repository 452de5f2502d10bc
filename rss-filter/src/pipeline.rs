use crate::config::RunConfig;
use crate::emitter::render;
use crate::filter::InclusionFilter;
use crate::parser::FeedParser;
use crate::reconcile::reconcile;
use crate::traits::FeedSource;
use crate::types::{Entry, FetchOutcome, FilterError, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// The previously published feed, as far as this run could tell.
#[derive(Debug)]
pub enum Archive {
    /// Merge into these entries. Empty when the feed doesn't exist yet.
    Available(Vec<Entry>),
    /// Retrieval or parsing failed; the fresh batch is published alone.
    Unavailable,
}

/// fetch -> parse -> filter -> (merge) -> render, once.
pub struct FilterPipeline<S> {
    source: S,
    parser: FeedParser,
}

impl<S: FeedSource> FilterPipeline<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            parser: FeedParser::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the whole pipeline and return the rendered document.
    ///
    /// `now` is both the reference for the recency cutoff and the build
    /// timestamp of RSS output.
    pub async fn run(&self, config: &RunConfig, now: DateTime<Utc>) -> Result<String> {
        let entries = self.collect(config, now).await?;
        info!("Rendering {} entries as {}", entries.len(), config.format);
        Ok(render(config.format, &entries, &config.feed_url, now))
    }

    /// Everything but the rendering step.
    pub async fn collect(&self, config: &RunConfig, now: DateTime<Utc>) -> Result<Vec<Entry>> {
        // The two retrievals don't depend on each other
        let archive = async {
            match config.archive_url.as_deref() {
                Some(url) => Some(self.load_archive(url).await),
                None => None,
            }
        };
        let (primary, archive) = tokio::join!(self.source.fetch(&config.feed_url), archive);

        let document = match primary? {
            FetchOutcome::Found(document) => document,
            FetchOutcome::NotFound => {
                return Err(FilterError::Status {
                    url: config.feed_url.clone(),
                    status: 404,
                });
            }
        };

        let feed = self.parser.parse_feed(&document)?;
        let filter = InclusionFilter::from_config(config.filter_config(now));
        info!("Filtering with rules: {}", filter.rule_names().join(", "));
        let fresh = filter.apply(feed.entries);

        match archive {
            Some(Archive::Available(existing)) => Ok(reconcile(fresh, existing, config.max_items)),
            Some(Archive::Unavailable) | None => Ok(fresh),
        }
    }

    /// Fetch and parse the previously published feed. Never fails the run.
    pub async fn load_archive(&self, url: &str) -> Archive {
        let document = match self.source.fetch(url).await {
            Ok(FetchOutcome::Found(document)) => document,
            Ok(FetchOutcome::NotFound) => {
                info!("No existing feed at {}, starting a new archive", url);
                return Archive::Available(Vec::new());
            }
            Err(e) => {
                warn!("Could not fetch existing feed {}: {}", url, e);
                return Archive::Unavailable;
            }
        };

        match self.parser.parse_entries(&document) {
            Ok(entries) => Archive::Available(entries),
            Err(e) => {
                warn!("Could not parse existing feed {}: {}", url, e);
                Archive::Unavailable
            }
        }
    }
}
