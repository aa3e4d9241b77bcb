//! Per-widget memo of resolved queries.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;
use typeahead_types::ResultItem;

/// Query → results memo.
///
/// Keys are the exact query text (no case or whitespace normalization).
/// Entries are written once and never evicted or invalidated for the life of
/// the widget; a hit hands back the same shared slice every time.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<String, Arc<[ResultItem]>>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has(&self, query: &str) -> bool {
        self.entries.contains_key(query)
    }

    #[must_use]
    pub fn get(&self, query: &str) -> Option<Arc<[ResultItem]>> {
        self.entries.get(query).cloned()
    }

    /// Store the results of `query`. An existing entry is kept as-is and
    /// returned; the first resolution of a query wins.
    pub fn store(&mut self, query: &str, results: Vec<ResultItem>) -> Arc<[ResultItem]> {
        if let Some(existing) = self.entries.get(query) {
            trace!("Cache entry for '{}' already present, keeping it", query);
            return Arc::clone(existing);
        }

        let entry: Arc<[ResultItem]> = results.into();
        self.entries.insert(query.to_string(), Arc::clone(&entry));
        entry
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
