#![allow(dead_code)]

use async_trait::async_trait;
use rss_filter::{Entry, FeedSource, FetchOutcome, FilterError, Result};
use std::collections::HashMap;
use std::sync::{Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Canned answer for one URL.
#[derive(Debug, Clone)]
pub enum Stub {
    Found(String),
    NotFound,
    Status(u16),
}

/// In-memory feed source keyed by URL. Unknown URLs answer 503.
#[derive(Default)]
pub struct StubSource {
    responses: HashMap<String, Stub>,
    requests: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, stub: Stub) -> Self {
        self.responses.insert(url.to_string(), stub);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for StubSource {
    async fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(Stub::Found(body)) => Ok(FetchOutcome::Found(body.clone())),
            Some(Stub::NotFound) => Ok(FetchOutcome::NotFound),
            Some(Stub::Status(status)) => Err(FilterError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(FilterError::Status {
                url: url.to_string(),
                status: 503,
            }),
        }
    }
}

/// Minimal RSS document around the given `<item>` blocks.
pub fn rss_document(items: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Engineering Blog</title>
    <link>https://blog.example.com</link>
    <description>Posts from the team</description>
{}
  </channel>
</rss>
"#,
        items.join("\n")
    )
}

/// An `<item>` with a title, link, date and optional author.
pub fn rss_item(title: &str, link: &str, pub_date: &str, author: Option<&str>) -> String {
    let creator = author
        .map(|a| format!("      <dc:creator>{}</dc:creator>\n", a))
        .unwrap_or_default();
    format!(
        "    <item>\n      <title>{}</title>\n      <link>{}</link>\n      <pubDate>{}</pubDate>\n{}    </item>",
        title, link, pub_date, creator
    )
}

pub fn entry(id: &str, published_at: &str, title: &str) -> Entry {
    Entry::new(title, format!("https://blog.example.com/{}", id))
        .with_id(id)
        .with_published_at(published_at)
}

pub fn titles(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.title.as_str()).collect()
}
