use std::collections::HashSet;
use tracing::debug;

/// Exact-match set of author names an entry must be written by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorAllowList {
    authors: HashSet<String>,
}

impl AuthorAllowList {
    /// Parse a newline separated list of names.
    ///
    /// Lines are trimmed; blank lines and `#` comments are skipped. Names are
    /// kept verbatim otherwise, so matching stays case-sensitive.
    pub fn parse(blob: &str) -> Self {
        let authors: HashSet<String> = blob
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        debug!("Loaded {} allowed authors", authors.len());
        Self { authors }
    }

    pub fn contains(&self, author: &str) -> bool {
        self.authors.contains(author)
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AuthorAllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            authors: iter.into_iter().map(Into::into).collect(),
        }
    }
}
