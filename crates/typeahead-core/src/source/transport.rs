//! Network collaborator used by remote sources.

use crate::error::ResolutionError;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde_json::Value;

/// Fetches a JSON document by URL.
///
/// The core owns URL templating; implementations own the network call. The
/// returned future must not borrow from `self` so it can run on its own task.
pub trait Transport: Send + Sync {
    fn fetch_json(&self, url: &str) -> BoxFuture<'static, Result<Value, ResolutionError>>;
}

/// Transport for widgets with a local source; every fetch fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn fetch_json(&self, url: &str) -> BoxFuture<'static, Result<Value, ResolutionError>> {
        let message = format!("no transport configured for {url}");
        async move { Err(ResolutionError::Transport(message)) }.boxed()
    }
}

/// HTTP transport backed by `reqwest`
#[cfg(feature = "http")]
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpTransport {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http")]
impl Transport for HttpTransport {
    fn fetch_json(&self, url: &str) -> BoxFuture<'static, Result<Value, ResolutionError>> {
        let request = self.client.get(url);
        async move {
            let response = request
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| ResolutionError::Transport(e.to_string()))?;
            response
                .json::<Value>()
                .await
                .map_err(|e| ResolutionError::Malformed(e.to_string()))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_transport_fails() {
        let result = NullTransport.fetch_json("https://example.com").await;
        assert!(matches!(result, Err(ResolutionError::Transport(msg)) if msg.contains("example.com")));
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_http_transport_rejects_invalid_url() {
        let transport = HttpTransport::default();
        let result = transport.fetch_json("not a url").await;
        assert!(matches!(result, Err(ResolutionError::Transport(_))));
    }
}
