//! Network transport.
//!
//! A [`Transport`] performs plain HTTP GETs and raw file downloads. Failures
//! never reach the caller as errors: a failed fetch is logged and comes back
//! as `None`, a failed download as `false`.

mod http;
pub mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

use async_trait::async_trait;
use std::path::Path;

/// A successful (2xx) response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL of the request, query string included
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// Create a 200 response
    pub fn ok(url: impl Into<String>, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status: 200,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether the server labelled the body as JSON
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
    }
}

/// Errors inside a transport; logged, never returned from [`Transport`] methods
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client could not be built
    #[error("Client error: {0}")]
    Client(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx answer
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
}

/// GET-only access to the site.
///
/// Implementations must not panic or return errors; soft failure is part of
/// the contract.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// GET `url` with optional query parameters appended
    async fn fetch(&self, url: &str, params: Option<&[(&str, &str)]>) -> Option<FetchedPage>;

    /// Fetch `url` and write the raw body to `destination`, overwriting it
    async fn download_file(&self, url: &str, destination: &Path) -> bool {
        let Some(page) = self.fetch(url, None).await else {
            return false;
        };

        match tokio::fs::write(destination, &page.body).await {
            Ok(()) => {
                tracing::info!("Downloaded -> {}", destination.display());
                true
            }
            Err(e) => {
                tracing::error!("Failed to save file {}: {}", destination.display(), e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_json() {
        let json = FetchedPage::ok("u", Some("application/json; charset=utf-8"), "{}");
        assert!(json.is_json());

        let html = FetchedPage::ok("u", Some("text/html"), "<html></html>");
        assert!(!html.is_json());

        let unlabelled = FetchedPage::ok("u", None, "{}");
        assert!(!unlabelled.is_json());
    }

    #[test]
    fn test_text_is_lossy() {
        let page = FetchedPage::ok("u", None, vec![b'a', 0xff, b'b']);
        assert_eq!(page.text(), "a\u{fffd}b");
    }
}
