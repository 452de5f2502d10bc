mod common;

use common::{entry, init_tracing, titles};
use rss_filter::reconcile::compare_recency;
use rss_filter::{parse_published, reconcile, Entry};
use std::cmp::Ordering;
use std::collections::HashSet;

fn keys(entries: &[Entry]) -> HashSet<String> {
    entries.iter().map(|e| e.identity_key().to_string()).collect()
}

#[test]
fn test_fresh_entry_supersedes_archived_copy() {
    init_tracing();

    let existing = vec![entry("1", "2024-01-01", "old")];
    let new = vec![entry("1", "2024-06-01", "new")];

    let merged = reconcile(new.clone(), existing, 10);
    assert_eq!(merged, new);
}

#[test]
fn test_new_wins_even_when_older() {
    // The fresh copy is canonical no matter what its date says
    let existing = vec![entry("1", "2024-06-01", "archived")];
    let new = vec![entry("1", "2024-01-01", "fresh")];

    let merged = reconcile(new, existing, 10);
    assert_eq!(titles(&merged), vec!["fresh"]);
    assert_eq!(merged[0].published_at.as_deref(), Some("2024-01-01"));
}

#[test]
fn test_reconciling_a_batch_with_itself_is_idempotent() {
    let batch = vec![
        entry("a", "2024-03-01", "a"),
        entry("b", "2024-05-01", "b"),
        entry("c", "garbage", "c"),
        entry("d", "2024-04-01", "d"),
    ];

    let merged = reconcile(batch.clone(), batch.clone(), 10);
    assert_eq!(merged.len(), batch.len());
    assert_eq!(keys(&merged), keys(&batch));
    assert_eq!(titles(&merged), vec!["b", "d", "a", "c"]);

    let again = reconcile(merged.clone(), merged.clone(), 10);
    assert_eq!(again, merged);
}

#[test]
fn test_key_survival_does_not_depend_on_argument_order() {
    let left = vec![entry("1", "2024-01-01", "left-1"), entry("2", "2024-01-02", "left-2")];
    let right = vec![entry("2", "2024-01-03", "right-2"), entry("3", "2024-01-04", "right-3")];

    let a = reconcile(left.clone(), right.clone(), 10);
    let b = reconcile(right, left, 10);

    assert_eq!(keys(&a), keys(&b));
    // ...but the value kept for the shared key is always the `new` one
    assert!(a.iter().any(|e| e.title == "left-2"));
    assert!(b.iter().any(|e| e.title == "right-2"));
}

#[test]
fn test_truncation_keeps_most_recent() {
    let new = vec![entry("d3", "2024-01-03", "D3"), entry("d1", "2024-03-01", "D1")];
    let existing = vec![entry("d2", "2024-02-01", "D2")];

    let merged = reconcile(new, existing, 2);
    assert_eq!(titles(&merged), vec!["D1", "D2"]);
}

#[test]
fn test_never_more_than_max_items() {
    let batch: Vec<Entry> = (1..=28)
        .map(|day| entry(&format!("id-{}", day), &format!("2024-02-{:02}", day), &format!("{}", day)))
        .collect();

    for max_items in [1, 5, 28, 100] {
        let merged = reconcile(batch.clone(), Vec::new(), max_items);
        assert_eq!(merged.len(), max_items.min(batch.len()));
        assert_eq!(merged[0].title, "28");
    }
}

#[test]
fn test_unparseable_dates_sort_last_in_feed_order() {
    let new = vec![
        entry("x", "not a date", "x"),
        entry("old", "2023-01-01", "old"),
        Entry::new("y", "https://blog.example.com/y"),
        entry("recent", "Sat, 15 Jun 2024 08:00:00 +0000", "recent"),
        entry("z", "soon", "z"),
    ];

    let merged = reconcile(new, Vec::new(), 10);
    assert_eq!(titles(&merged), vec!["recent", "old", "x", "y", "z"]);

    let truncated = reconcile(merged, Vec::new(), 3);
    assert_eq!(titles(&truncated), vec!["recent", "old", "x"]);
}

#[test]
fn test_mixed_date_encodings_sort_by_instant() {
    let new = vec![
        entry("iso", "2024-06-01T12:00:00+00:00", "iso"),
        entry("rfc", "Sat, 01 Jun 2024 13:00:00 +0000", "rfc"),
        entry("named", "Sat, 01 Jun 2024 09:30:00 EDT", "named"),
        entry("day", "2024-06-01", "day"),
    ];

    let merged = reconcile(new, Vec::new(), 10);
    assert_eq!(titles(&merged), vec!["named", "rfc", "iso", "day"]);
}

#[test]
fn test_link_is_the_key_without_guid() {
    let archived = Entry::new("archived", "https://blog.example.com/post").with_published_at("2024-01-01");
    let fresh = Entry::new("fresh", "https://blog.example.com/post").with_published_at("2024-01-01");
    let other = Entry::new("other", "https://blog.example.com/other").with_published_at("2023-01-01");

    let merged = reconcile(vec![fresh], vec![archived, other], 10);
    assert_eq!(titles(&merged), vec!["fresh", "other"]);
}

#[test]
fn test_guid_matching_link_is_same_entry() {
    let archived = Entry::new("archived", "https://blog.example.com/post")
        .with_id("https://blog.example.com/post")
        .with_published_at("2024-01-01");
    let fresh = Entry::new("fresh", "https://blog.example.com/post").with_published_at("2024-01-02");

    let merged = reconcile(vec![fresh], vec![archived], 10);
    assert_eq!(titles(&merged), vec!["fresh"]);
}

#[test]
fn test_empty_archive() {
    let new = vec![entry("1", "2024-01-01", "one")];
    assert_eq!(reconcile(new.clone(), Vec::new(), 10), new);
    assert!(reconcile(Vec::new(), Vec::new(), 10).is_empty());
}

#[test]
fn test_compare_recency_is_total() {
    let early = parse_published("2024-01-01").unwrap();
    let late = parse_published("2024-06-01").unwrap();

    assert_eq!(compare_recency(Some(&late), Some(&early)), Ordering::Less);
    assert_eq!(compare_recency(Some(&early), Some(&late)), Ordering::Greater);
    assert_eq!(compare_recency(Some(&early), Some(&early)), Ordering::Equal);
    assert_eq!(compare_recency(Some(&early), None), Ordering::Less);
    assert_eq!(compare_recency(None, Some(&early)), Ordering::Greater);
    assert_eq!(compare_recency(None, None), Ordering::Equal);
}
