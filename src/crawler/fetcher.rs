//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the single shared HTTP client
//! - Capping simultaneous requests with a global semaphore
//! - GET requests returning page text or raw bytes
//! - Retrying connection-level failures forever
//!
//! Any non-success HTTP status is fatal and propagates to the caller.

use crate::config::CrawlerConfig;
use crate::crawler::retry::{retry_forever, RetryPolicy};
use crate::CrawlError;
use reqwest::{Client, Response};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Builds the HTTP client shared by every fetch of a crawl
///
/// Proxy settings are taken from the environment (reqwest default).
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(config.request_timeout())
        .pool_max_idle_per_host(config.max_connections as usize)
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Connection-pooled GET client with unbounded transient retry
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    permits: Arc<Semaphore>,
    retry: RetryPolicy,
}

impl Fetcher {
    /// Creates a fetcher from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let client = build_http_client(config).map_err(CrawlError::Client)?;
        Ok(Self::with_client(
            client,
            config.max_connections as usize,
            RetryPolicy::new(config.retry_backoff()),
        ))
    }

    pub fn with_client(client: Client, max_connections: usize, retry: RetryPolicy) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_connections)),
            retry,
        }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetches a page as text
    pub async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        retry_forever(&self.retry, url, move || async move {
            let _permit = self.permits.acquire().await.ok();
            let response = self.get(url).await?;
            response.text().await.map_err(|source| CrawlError::Http {
                url: url.to_string(),
                source,
            })
        })
        .await
    }

    /// Fetches a resource as raw bytes
    pub async fn fetch_binary(&self, url: &str) -> Result<Vec<u8>, CrawlError> {
        retry_forever(&self.retry, url, move || async move {
            let _permit = self.permits.acquire().await.ok();
            let response = self.get(url).await?;
            response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .map_err(|source| CrawlError::Http {
                    url: url.to_string(),
                    source,
                })
        })
        .await
    }

    /// Sends a GET and rejects non-success statuses
    async fn get(&self, url: &str) -> Result<Response, CrawlError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CrawlError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}
