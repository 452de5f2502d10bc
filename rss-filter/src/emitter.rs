//! Rendering the final entry list as Markdown or RSS 2.0.

use crate::types::{Entry, OutputFormat};
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub const CHANNEL_TITLE: &str = "Filtered Technical Blog Posts";
pub const CHANNEL_DESCRIPTION: &str = "Filtered feed of technical blog posts";
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
pub const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";

/// Author shown in Markdown output for entries without one.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

const BUILD_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Render `entries` in the requested format. Entries are neither dropped
/// nor reordered.
pub fn render(
    format: OutputFormat,
    entries: &[Entry],
    feed_url: &str,
    built_at: DateTime<Utc>,
) -> String {
    match format {
        OutputFormat::Markdown => render_markdown(entries),
        OutputFormat::Rss => render_rss(entries, feed_url, built_at),
    }
}

/// One `- [title](link) - author` line per entry.
pub fn render_markdown(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let author = entry.author().unwrap_or(UNKNOWN_AUTHOR);
        let _ = writeln!(out, "- [{}]({}) - {}", entry.title, entry.link, author);
    }
    out
}

/// An RSS 2.0 document carrying the Dublin Core and content namespaces.
pub fn render_rss(entries: &[Entry], feed_url: &str, built_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        out,
        "<rss version=\"2.0\" xmlns:dc=\"{}\" xmlns:content=\"{}\">",
        DC_NAMESPACE, CONTENT_NAMESPACE
    );
    out.push_str("  <channel>\n");
    let _ = writeln!(out, "    <title>{}</title>", CHANNEL_TITLE);
    let _ = writeln!(out, "    <link>{}</link>", escape_xml(feed_url));
    let _ = writeln!(out, "    <description>{}</description>", CHANNEL_DESCRIPTION);
    let _ = writeln!(
        out,
        "    <lastBuildDate>{}</lastBuildDate>",
        built_at.format(BUILD_DATE_FORMAT)
    );

    for entry in entries {
        write_item(&mut out, entry);
    }

    out.push_str("  </channel>\n");
    out.push_str("</rss>\n");
    out
}

fn write_item(out: &mut String, entry: &Entry) {
    out.push_str("    <item>\n");
    write_element(out, "title", &entry.title);
    write_element(out, "link", &entry.link);

    let optional = [
        ("guid", &entry.id),
        ("pubDate", &entry.published_at),
        ("dc:creator", &entry.author),
        ("description", &entry.summary),
    ];
    for (tag, value) in optional {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            write_element(out, tag, value);
        }
    }

    if let Some(body) = entry.body.as_deref().filter(|b| !b.is_empty()) {
        let _ = writeln!(
            out,
            "      <content:encoded>{}</content:encoded>",
            cdata(body)
        );
    }

    for category in entry.tags.iter().filter(|c| !c.is_empty()) {
        write_element(out, "category", category);
    }

    out.push_str("    </item>\n");
}

fn write_element(out: &mut String, tag: &str, text: &str) {
    let _ = writeln!(out, "      <{tag}>{}</{tag}>", escape_xml(text));
}

/// Escape the five XML special characters. `&` goes first so the entities
/// introduced by later replacements aren't escaped twice.
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Wrap markup in a CDATA section. A `]]>` inside the markup would close
/// the section early, so it is split across two sections.
pub fn cdata(markup: &str) -> String {
    format!("<![CDATA[{}]]>", markup.replace("]]>", "]]]]><![CDATA[>"))
}
