use crate::config::QUERY_PLACEHOLDER;

/// Remote URL template containing the `{query}` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute the query for the first `{query}` placeholder.
    ///
    /// The query is inserted literally; escaping is the caller's concern.
    #[must_use]
    pub fn expand(&self, query: &str) -> String {
        self.0.replacen(QUERY_PLACEHOLDER, query, 1)
    }
}
