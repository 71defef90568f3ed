//! Candidate document download.
//!
//! One bounded HTTP GET per candidate URL. Every failure mode is typed so
//! the pipeline can log it and move on to the next candidate.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::FetchConfig;

/// Errors that can occur while downloading a candidate document
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request exceeded the per-request timeout
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status
    #[error("server returned HTTP {0}")]
    Status(u16),

    /// Connection, DNS, or protocol failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// The DocumentFetcher trait retrieves raw bytes for one candidate URL.
#[async_trait]
pub trait DocumentFetcher: Send + Sync + std::fmt::Debug {
    /// Fetch the resource, bounded by the configured per-request timeout.
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP fetcher backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a new fetcher from the fetch configuration
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).timeout(self.timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
