use crate::emitter::{CONTENT_NAMESPACE, DC_NAMESPACE};
use crate::types::{Entry, FilterError, ParsedFeed, Result};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use tracing::{debug, info};

/// Item children the parser keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemField {
    Title,
    Link,
    PubDate,
    Creator,
    Description,
    Encoded,
    Guid,
    Category,
}

/// Channel children kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChannelField {
    Title,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Item(ItemField),
    Channel(ChannelField),
}

impl ItemField {
    fn resolve(namespace: &ResolveResult, local_name: &[u8]) -> Option<Self> {
        match namespace {
            ResolveResult::Unbound => match local_name {
                b"title" => Some(ItemField::Title),
                b"link" => Some(ItemField::Link),
                b"pubDate" => Some(ItemField::PubDate),
                b"description" => Some(ItemField::Description),
                b"guid" => Some(ItemField::Guid),
                b"category" => Some(ItemField::Category),
                _ => None,
            },
            ResolveResult::Bound(Namespace(ns)) if *ns == DC_NAMESPACE.as_bytes() => {
                (local_name == b"creator").then_some(ItemField::Creator)
            }
            ResolveResult::Bound(Namespace(ns)) if *ns == CONTENT_NAMESPACE.as_bytes() => {
                (local_name == b"encoded").then_some(ItemField::Encoded)
            }
            _ => None,
        }
    }

    fn store(self, entry: &mut Entry, text: String) {
        let text = trimmed(text);
        match self {
            ItemField::Title => entry.title = text,
            ItemField::Link => entry.link = text,
            ItemField::PubDate => entry.published_at = non_empty(text),
            ItemField::Creator => entry.author = non_empty(text),
            ItemField::Description => entry.summary = non_empty(text),
            ItemField::Encoded => entry.body = non_empty(text),
            ItemField::Guid => entry.id = non_empty(text),
            ItemField::Category => {
                if !text.is_empty() {
                    entry.tags.push(text);
                }
            }
        }
    }
}

/// Reads RSS 2.0 documents (`<rss><channel><item>...`) into [`Entry`] values.
///
/// `dc:creator` and `content:encoded` are recognised by namespace URI, so a
/// publisher binding those vocabularies to other prefixes still parses.
#[derive(Debug, Default)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_feed(&self, content: &str) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        // Fields are trimmed once when they close, not per text event
        let mut reader = NsReader::from_str(content);

        let mut feed = ParsedFeed::default();
        // Local names of the open elements, root first
        let mut path: Vec<Vec<u8>> = Vec::new();
        let mut seen_root = false;
        let mut item: Option<Entry> = None;
        let mut capture: Option<Capture> = None;
        let mut text = String::new();

        loop {
            let (namespace, event) = match reader.read_resolved_event() {
                Ok(resolved) => resolved,
                Err(e) => return Err(parse_error(e)),
            };

            match event {
                Event::Start(start) => {
                    let local_name = start.local_name().as_ref().to_vec();
                    path.push(local_name);
                    seen_root = true;

                    if capture.is_some() {
                        // Markup nested inside a captured field contributes its text
                        continue;
                    }

                    match path.len() {
                        3 if in_channel(&path) && path[2] == b"item" => {
                            item = Some(Entry::default());
                        }
                        3 if in_channel(&path) => {
                            capture = match path[2].as_slice() {
                                b"title" => Some(Capture::Channel(ChannelField::Title)),
                                b"description" => Some(Capture::Channel(ChannelField::Description)),
                                _ => None,
                            };
                            text.clear();
                        }
                        4 if item.is_some() => {
                            capture = ItemField::resolve(&namespace, &path[3]).map(Capture::Item);
                            text.clear();
                        }
                        _ => {}
                    }
                }
                Event::Empty(empty) => {
                    seen_root = true;
                    if path.len() == 2 && in_channel(&path) && empty.local_name().as_ref() == b"item" {
                        feed.entries.push(Entry::default());
                    }
                }
                Event::Text(raw) => {
                    if capture.is_some() {
                        let unescaped = raw.unescape().map_err(parse_error)?;
                        text.push_str(&unescaped);
                    }
                }
                Event::CData(raw) => {
                    if capture.is_some() {
                        let bytes = raw.into_inner();
                        let decoded = std::str::from_utf8(&bytes)
                            .map_err(|e| FilterError::Parse(format!("Invalid UTF-8 in CDATA: {}", e)))?;
                        text.push_str(decoded);
                    }
                }
                Event::End(_) => {
                    let depth = path.len();
                    path.pop();

                    match (depth, capture) {
                        (4, Some(Capture::Item(field))) => {
                            if let Some(entry) = item.as_mut() {
                                field.store(entry, std::mem::take(&mut text));
                            }
                            capture = None;
                        }
                        (3, Some(Capture::Channel(field))) => {
                            let value = non_empty(trimmed(std::mem::take(&mut text)));
                            match field {
                                ChannelField::Title => feed.title = value,
                                ChannelField::Description => feed.description = value,
                            }
                            capture = None;
                        }
                        (3, None) => {
                            if let Some(entry) = item.take() {
                                feed.entries.push(entry);
                            }
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(FilterError::Parse("Document has no root element".to_string()));
        }

        if !path.is_empty() {
            return Err(FilterError::Parse(format!(
                "Unexpected end of document inside <{}>",
                String::from_utf8_lossy(&path[path.len() - 1])
            )));
        }

        info!(
            "Parsed feed {} with {} entries",
            feed.title.as_deref().unwrap_or("(untitled)"),
            feed.entries.len()
        );

        Ok(feed)
    }

    /// Parse a document and return only its entries.
    pub fn parse_entries(&self, content: &str) -> Result<Vec<Entry>> {
        self.parse_feed(content).map(|feed| feed.entries)
    }
}

fn in_channel(path: &[Vec<u8>]) -> bool {
    path.len() >= 2 && path[1] == b"channel"
}

fn trimmed(text: String) -> String {
    let trimmed = text.trim();
    if trimmed.len() == text.len() {
        text
    } else {
        trimmed.to_string()
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_error(e: quick_xml::Error) -> FilterError {
    FilterError::Parse(format!("Failed to parse feed: {}", e))
}
