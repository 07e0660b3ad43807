//! In-memory transport for tests and offline runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{FetchedPage, Transport};

/// A transport that serves predefined pages.
///
/// Pages are keyed by URL without the extra query parameters; any URL with
/// no registered page behaves like a failed request.
#[derive(Debug, Default)]
pub struct MockTransport {
    pages: Mutex<HashMap<String, FetchedPage>>,
    requests: Mutex<Vec<MockRequest>>,
}

/// A request seen by [`MockTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl MockTransport {
    /// Create a transport with no pages, where every request fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve an HTML page at `url`.
    pub fn with_html(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.with_page(url, Some("text/html; charset=utf-8"), html.into().into_bytes())
    }

    /// Serve a body with the given content type at `url`.
    pub fn with_page(
        self,
        url: impl Into<String>,
        content_type: Option<&str>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        let url = url.into();
        let page = FetchedPage::ok(url.clone(), content_type, body);
        self.lock_pages().insert(url, page);
        self
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// URLs requested so far, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    fn lock_pages(&self) -> std::sync::MutexGuard<'_, HashMap<String, FetchedPage>> {
        self.pages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, url: &str, params: Option<&[(&str, &str)]>) -> Option<FetchedPage> {
        let params: Vec<(String, String)> = params
            .unwrap_or_default()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(MockRequest {
                url: url.to_string(),
                params,
            });

        let page = self.lock_pages().get(url).cloned();
        if page.is_none() {
            tracing::error!("Request failed for {} -> no mock page", url);
        }
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serves_registered_pages() {
        let transport = MockTransport::new().with_html("https://example.com/a", "<p>a</p>");

        let page = transport.fetch("https://example.com/a", None).await.unwrap();
        assert_eq!(page.text(), "<p>a</p>");
        assert!(transport.fetch("https://example.com/b", None).await.is_none());
        assert_eq!(
            transport.requested_urls(),
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[tokio::test]
    async fn test_mock_records_params() {
        let transport = MockTransport::new();
        transport
            .fetch("https://example.com/s", Some(&[("case_no", "10")][..]))
            .await;

        let requests = transport.requests();
        assert_eq!(
            requests[0].params,
            vec![("case_no".to_string(), "10".to_string())]
        );
    }
}
