//! Result sources: local contains-filtering or a remote fetch per query.

mod template;
mod transport;

pub use template::UrlTemplate;
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{NullTransport, Transport};

use crate::config::SourceConfig;
use crate::error::ResolutionError;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde_json::Value;
use tracing::debug;
use typeahead_types::{FieldNames, ResultItem};

/// Outcome of asking a source for the results of one query
pub enum Resolution {
    /// Results available synchronously (local source)
    Ready(Vec<ResultItem>),

    /// Results arrive when the fetch completes (remote source)
    Pending(BoxFuture<'static, Result<Vec<ResultItem>, ResolutionError>>),
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(results) => f.debug_tuple("Ready").field(&results.len()).finish(),
            Self::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// Where a widget's results come from. Fixed at construction.
#[derive(Debug, Clone)]
pub enum ResultSource {
    /// Pre-supplied candidates filtered by label
    Local(Vec<ResultItem>),

    /// URL template fetched once per cache miss
    Remote(UrlTemplate),
}

impl From<SourceConfig> for ResultSource {
    fn from(config: SourceConfig) -> Self {
        match config {
            SourceConfig::Local(candidates) => Self::Local(candidates),
            SourceConfig::Remote(template) => Self::Remote(UrlTemplate::new(template)),
        }
    }
}

impl ResultSource {
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Resolve `query` to results.
    ///
    /// Local sources answer immediately; remote sources start exactly one
    /// fetch through `transport` and hand back its pending completion.
    pub fn resolve(&self, query: &str, fields: &FieldNames, transport: &dyn Transport) -> Resolution {
        match self {
            Self::Local(candidates) => Resolution::Ready(filter_local(candidates, query, fields)),
            Self::Remote(template) => {
                let url = template.expand(query);
                debug!("Fetching remote results for '{}' from {}", query, url);
                let fetch = transport.fetch_json(&url);
                Resolution::Pending(async move { parse_results(fetch.await?) }.boxed())
            }
        }
    }
}

/// Candidates whose label contains `query` (case-sensitive), in source order
#[must_use]
pub fn filter_local(candidates: &[ResultItem], query: &str, fields: &FieldNames) -> Vec<ResultItem> {
    candidates
        .iter()
        .filter(|candidate| candidate.label(fields).contains(query))
        .cloned()
        .collect()
}

/// Interpret a remote payload as a result sequence.
///
/// # Errors
///
/// Returns `ResolutionError::Malformed` when the payload is not a JSON array.
pub fn parse_results(payload: Value) -> Result<Vec<ResultItem>, ResolutionError> {
    match payload {
        Value::Array(values) => Ok(values.into_iter().map(ResultItem::new).collect()),
        other => Err(ResolutionError::Malformed(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
