//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::{FetchedPage, Transport, TransportError};
use crate::config::HttpConfig;

/// Shared HTTP client with the identifying User-Agent and a bounded timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Arc<Client>,
}

impl HttpTransport {
    /// Create a transport from the HTTP settings
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self::from_client(Arc::new(client)))
    }

    /// Create from an existing reqwest Client
    pub fn from_client(client: Arc<Client>) -> Self {
        Self { client }
    }

    async fn try_fetch(
        &self,
        url: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<FetchedPage, TransportError> {
        let mut request = self.client.get(url);
        if let Some(params) = params {
            request = request.query(params);
        }

        let response = request.send().await?;
        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: final_url,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(FetchedPage {
            url: final_url,
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str, params: Option<&[(&str, &str)]>) -> Option<FetchedPage> {
        match self.try_fetch(url, params).await {
            Ok(page) => {
                tracing::debug!("GET {} -> {}", page.url, page.status);
                Some(page)
            }
            Err(e) => {
                tracing::error!("Request failed for {} -> {}", url, e);
                None
            }
        }
    }
}
