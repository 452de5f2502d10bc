use crate::allow_list::AuthorAllowList;
use crate::dates::parse_published;
use crate::types::Entry;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use url::{ParseError, Url};

const RELATIVE_BASE: &str = "http://relative.invalid/";

/// One link of the inclusion chain.
pub trait InclusionRule: Send + Sync {
    /// Whether the entry may stay in the feed.
    fn admits(&self, entry: &Entry) -> bool;

    /// Name used when logging why an entry was dropped
    fn rule_name(&self) -> &'static str;
}

/// Settings the inclusion chain is built from.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Entries published before this instant are dropped.
    pub cutoff: Option<DateTime<Utc>>,
    /// When set, only these authors are kept.
    pub allow_list: Option<AuthorAllowList>,
}

impl FilterConfig {
    /// `since_days <= 0` means no recency limit. A window reaching past the
    /// earliest representable instant is clamped to it.
    pub fn cutoff_for(now: DateTime<Utc>, since_days: i64) -> Option<DateTime<Utc>> {
        if since_days <= 0 {
            return None;
        }

        let cutoff = Duration::try_days(since_days)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Some(cutoff)
    }
}

/// Drops marketing posts: links under `/news/` or `/articles/`, or tagged
/// with a `post_type` of `news`, `article` or `articles`.
pub struct MarketingPathRule;

impl MarketingPathRule {
    const BLOCKED_SEGMENTS: [&'static str; 2] = ["/news/", "/articles/"];
    const BLOCKED_POST_TYPES: [&'static str; 3] = ["news", "article", "articles"];

    pub fn matches(link: &str) -> bool {
        // Unparseable links are kept
        let Some((url, rooted)) = Self::parse_link(link) else {
            return false;
        };

        let path = if rooted {
            url.path()
        } else {
            // `news/x` resolved against the base became `/news/x`
            url.path().strip_prefix('/').unwrap_or(url.path())
        };
        if Self::BLOCKED_SEGMENTS.iter().any(|segment| path.contains(segment)) {
            return true;
        }

        url.query_pairs()
            .find(|(key, _)| key == "post_type")
            .is_some_and(|(_, value)| Self::BLOCKED_POST_TYPES.contains(&value.as_ref()))
    }

    /// Absolute links parse as they are; relative references (`/news/x`,
    /// `example.com/articles/x`, `?post_type=news`) are resolved against a
    /// placeholder base so their path and query can still be inspected.
    /// The flag is false when the reference's path didn't start at `/`.
    fn parse_link(link: &str) -> Option<(Url, bool)> {
        match Url::parse(link) {
            Ok(url) => Some((url, true)),
            Err(ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(RELATIVE_BASE).ok()?;
                let url = base.join(link).ok()?;
                Some((url, link.starts_with('/')))
            }
            Err(_) => None,
        }
    }
}

impl InclusionRule for MarketingPathRule {
    fn admits(&self, entry: &Entry) -> bool {
        !Self::matches(&entry.link)
    }

    fn rule_name(&self) -> &'static str {
        "marketing_path"
    }
}

/// Drops entries whose author looks like an email address (`@`) or a
/// "Name, Title" signature (`,`). Entries without an author pass.
pub struct AuthorIdentityRule;

impl AuthorIdentityRule {
    pub fn matches(author: &str) -> bool {
        author.contains('@') || author.contains(',')
    }
}

impl InclusionRule for AuthorIdentityRule {
    fn admits(&self, entry: &Entry) -> bool {
        !entry.author().is_some_and(Self::matches)
    }

    fn rule_name(&self) -> &'static str {
        "author_identity"
    }
}

/// Keeps only entries written by an allowed author.
pub struct AllowListRule {
    allow_list: AuthorAllowList,
}

impl AllowListRule {
    pub fn new(allow_list: AuthorAllowList) -> Self {
        Self { allow_list }
    }
}

impl InclusionRule for AllowListRule {
    fn admits(&self, entry: &Entry) -> bool {
        entry
            .author()
            .is_some_and(|author| self.allow_list.contains(author))
    }

    fn rule_name(&self) -> &'static str {
        "allow_list"
    }
}

/// Keeps entries published at or after the cutoff. An entry whose date is
/// missing or unreadable can't prove it is recent and is dropped.
pub struct RecencyRule {
    cutoff: DateTime<Utc>,
}

impl RecencyRule {
    pub fn new(cutoff: DateTime<Utc>) -> Self {
        Self { cutoff }
    }
}

impl InclusionRule for RecencyRule {
    fn admits(&self, entry: &Entry) -> bool {
        let Some(raw) = entry.published_at.as_deref() else {
            return false;
        };

        match parse_published(raw) {
            Ok(published) => published >= self.cutoff,
            Err(e) => {
                debug!("{} ({})", e, entry.link);
                false
            }
        }
    }

    fn rule_name(&self) -> &'static str {
        "recency"
    }
}

/// Ordered chain of inclusion rules. An entry survives only if every rule
/// admits it; evaluation stops at the first rule that doesn't.
#[derive(Default)]
pub struct InclusionFilter {
    rules: Vec<Box<dyn InclusionRule>>,
}

impl InclusionFilter {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The standard chain: structural rules first, then the optional
    /// allow-list and recency rules.
    pub fn from_config(config: FilterConfig) -> Self {
        let mut filter = Self::new()
            .with_rule(MarketingPathRule)
            .with_rule(AuthorIdentityRule);

        if let Some(allow_list) = config.allow_list {
            filter = filter.with_rule(AllowListRule::new(allow_list));
        }

        if let Some(cutoff) = config.cutoff {
            filter = filter.with_rule(RecencyRule::new(cutoff));
        }

        filter
    }

    pub fn with_rule(mut self, rule: impl InclusionRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.rule_name()).collect()
    }

    /// The first rule that rejects the entry, if any.
    pub fn rejecting_rule(&self, entry: &Entry) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| !rule.admits(entry))
            .map(|rule| rule.rule_name())
    }

    pub fn admits(&self, entry: &Entry) -> bool {
        self.rejecting_rule(entry).is_none()
    }

    /// Keep the admitted entries, in feed order.
    pub fn apply(&self, entries: Vec<Entry>) -> Vec<Entry> {
        let total = entries.len();

        let kept: Vec<Entry> = entries
            .into_iter()
            .filter(|entry| match self.rejecting_rule(entry) {
                Some(rule) => {
                    debug!("Dropping entry {} (rule: {})", entry.link, rule);
                    false
                }
                None => true,
            })
            .collect();

        info!("Kept {} of {} entries", kept.len(), total);
        kept
    }
}
