//! Publication timestamp parsing.
//!
//! Feeds in the wild disagree on how to write a date, sometimes within the
//! same document. The parser walks a fixed list of encodings and takes the
//! first one that fits; it never substitutes "now" for a date it can't read.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

/// A publication timestamp that matches none of the known encodings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to parse date: {0}")]
pub struct DateUnparseable(pub String);

const RFC1123_NUMERIC: &str = "%d %b %Y %H:%M:%S %z";
const RFC1123_NAMED: &str = "%d %b %Y %H:%M:%S";
const RFC822_NUMERIC: &str = "%d %b %y %H:%M %z";
const RFC822_NAMED: &str = "%d %b %y %H:%M";
const DATE_ONLY: &str = "%Y-%m-%d";

/// Parse a publication date in one of the encodings feeds commonly use.
///
/// Tried in order:
/// - `Mon, 02 Jan 2006 15:04:05 -0700` (RSS canonical)
/// - `Mon, 02 Jan 2006 15:04:05 MST`
/// - `02 Jan 06 15:04 -0700`
/// - `02 Jan 06 15:04 MST`
/// - `2006-01-02T15:04:05Z07:00`
/// - `2006-01-02` (midnight UTC)
///
/// The weekday is only checked for shape; a weekday that doesn't agree with
/// the date is ignored.
pub fn parse_published(date_str: &str) -> Result<DateTime<FixedOffset>, DateUnparseable> {
    let trimmed = date_str.trim();
    let undated = strip_weekday(trimmed);

    if let Ok(date) = DateTime::parse_from_str(undated, RFC1123_NUMERIC) {
        return Ok(date);
    }

    if let Some(date) = parse_with_zone_name(undated, RFC1123_NAMED) {
        return Ok(date);
    }

    if let Ok(date) = DateTime::parse_from_str(trimmed, RFC822_NUMERIC) {
        return Ok(date);
    }

    if let Some(date) = parse_with_zone_name(trimmed, RFC822_NAMED) {
        return Ok(date);
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date);
    }

    if let Ok(day) = NaiveDate::parse_from_str(trimmed, DATE_ONLY) {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().fixed_offset());
        }
    }

    Err(DateUnparseable(trimmed.to_string()))
}

/// Drop a leading `Mon, ` so the weekday can't veto an otherwise valid date.
fn strip_weekday(date_str: &str) -> &str {
    match date_str.split_once(',') {
        Some((day, rest)) if !day.is_empty() && day.chars().all(|c| c.is_ascii_alphabetic()) => {
            rest.trim_start()
        }
        _ => date_str,
    }
}

/// Parse `<naive datetime> <ZONE>` where the zone is an abbreviation.
fn parse_with_zone_name(date_str: &str, format: &str) -> Option<DateTime<FixedOffset>> {
    let (naive_part, zone) = date_str.rsplit_once(' ')?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(naive_part.trim_end(), format).ok()?;
    let offset = FixedOffset::east_opt(zone_offset_hours(zone) * 3600)?;
    offset.from_local_datetime(&naive).single()
}

/// RFC 822 zone names. Anything else is taken as UTC.
fn zone_offset_hours(zone: &str) -> i32 {
    match zone.to_ascii_uppercase().as_str() {
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        _ => 0,
    }
}
