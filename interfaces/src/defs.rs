/// One item of a syndication feed.
///
/// Only `title` and `link` are guaranteed by a well-formed document. Every
/// other field is `None` when the document does not carry it (or carries an
/// empty element), so "absent" is never confused with "empty".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub link: String,
    /// Publication timestamp exactly as the publisher wrote it.
    pub published_at: Option<String>,
    pub author: Option<String>,
    pub summary: Option<String>,
    /// Pre-formatted markup (e.g. `content:encoded`).
    pub body: Option<String>,
    /// The feed's GUID.
    pub id: Option<String>,
    pub tags: Vec<String>,
}

impl Entry {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// The key two snapshots of the same logical item share: the GUID when
    /// present, the link otherwise. A GUID equal to another entry's link is
    /// the same key.
    pub fn identity_key(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &self.link,
        }
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref().filter(|a| !a.is_empty())
    }
}

// Object style note:
// Entries are plain values built once by the document parser. Pipeline
// stages take them by value and only select, drop or reorder them; none of
// them edits a field.
