//! In-flight remote fetches of one widget.

use crate::error::ResolutionError;
use futures_util::future::BoxFuture;
use std::collections::HashSet;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use typeahead_types::ResultItem;

type FetchOutcome = Result<Vec<ResultItem>, ResolutionError>;

/// Fetches running on their own tasks, at most one per query.
///
/// Fetches are never cancelled individually; a superseded fetch still runs
/// to completion. `abort_all` is only used on teardown.
pub(super) struct FetchSet {
    tasks: JoinSet<(String, FetchOutcome)>,
    in_flight: HashSet<String>,
    timeout: Option<Duration>,
}

impl FetchSet {
    pub(super) fn new(timeout: Option<Duration>) -> Self {
        Self {
            tasks: JoinSet::new(),
            in_flight: HashSet::new(),
            timeout,
        }
    }

    pub(super) fn is_in_flight(&self, query: &str) -> bool {
        self.in_flight.contains(query)
    }

    pub(super) fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(super) fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Run `fetch` for `query` on a new task, bounded by the timeout if set
    pub(super) fn dispatch(&mut self, query: String, fetch: BoxFuture<'static, FetchOutcome>) {
        debug!("Dispatching fetch for '{}'", query);
        self.in_flight.insert(query.clone());

        let timeout = self.timeout;
        self.tasks.spawn(async move {
            let outcome = match timeout {
                Some(limit) => tokio::time::timeout(limit, fetch).await.unwrap_or_else(|_| {
                    Err(ResolutionError::TimedOut {
                        after_ms: duration_ms(limit),
                    })
                }),
                None => fetch.await,
            };
            (query, outcome)
        });
    }

    /// Wait for the next fetch to finish. `None` when nothing is in flight.
    pub(super) async fn next_completion(&mut self) -> Option<(String, FetchOutcome)> {
        loop {
            match self.tasks.join_next().await? {
                Ok((query, outcome)) => {
                    self.in_flight.remove(&query);
                    return Some((query, outcome));
                }
                Err(e) if e.is_cancelled() => {
                    debug!("Fetch task cancelled");
                }
                Err(e) => {
                    warn!("Fetch task failed: {}", e);
                }
            }
        }
    }

    pub(super) fn abort_all(&mut self) {
        if !self.tasks.is_empty() {
            debug!("Aborting {} in-flight fetches", self.tasks.len());
        }
        self.tasks.abort_all();
        self.in_flight.clear();
    }
}

// Timeouts come from u64 millisecond options
#[allow(clippy::cast_possible_truncation)]
fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
