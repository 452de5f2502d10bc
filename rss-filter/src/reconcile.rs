//! Merging a fresh batch of entries into a previously published archive.

use crate::dates::parse_published;
use crate::types::Entry;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use std::cmp::Ordering;
use tracing::{debug, info};

/// Merge `new` into `existing`, newest first, keeping at most `max_items`.
///
/// Entries are deduplicated by identity key and the fresh copy always wins,
/// even when it is identical to the archived one. Entries whose date can't
/// be parsed go after every dated entry and keep their relative order.
pub fn reconcile(new: Vec<Entry>, existing: Vec<Entry>, max_items: usize) -> Vec<Entry> {
    let fresh_count = new.len();
    let archived_count = existing.len();

    let mut by_key: IndexMap<String, Entry> = IndexMap::with_capacity(fresh_count + archived_count);

    for entry in new {
        by_key.insert(entry.identity_key().to_string(), entry);
    }

    for entry in existing {
        // Fresh copies already present take precedence
        by_key
            .entry(entry.identity_key().to_string())
            .or_insert(entry);
    }

    let mut dated: Vec<(Option<DateTime<FixedOffset>>, Entry)> = by_key
        .into_values()
        .map(|entry| (publication_instant(&entry), entry))
        .collect();

    dated.sort_by(|(a, _), (b, _)| compare_recency(a.as_ref(), b.as_ref()));

    let merged_count = dated.len();
    if merged_count > max_items {
        debug!("Evicting {} oldest entries", merged_count - max_items);
        dated.truncate(max_items);
    }

    info!(
        "Merged {} fresh and {} archived entries into {} ({} kept)",
        fresh_count,
        archived_count,
        merged_count,
        dated.len()
    );

    dated.into_iter().map(|(_, entry)| entry).collect()
}

/// Three-way comparison for newest-first ordering.
///
/// Dated entries come before undated ones; two undated entries compare
/// equal so a stable sort leaves them where they were.
pub fn compare_recency(
    a: Option<&DateTime<FixedOffset>>,
    b: Option<&DateTime<FixedOffset>>,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn publication_instant(entry: &Entry) -> Option<DateTime<FixedOffset>> {
    entry
        .published_at
        .as_deref()
        .and_then(|raw| parse_published(raw).ok())
}
