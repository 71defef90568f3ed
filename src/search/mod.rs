//! Search providers with a trait-based seam.
//!
//! This module defines the [`SearchProvider`] trait that all web search
//! backends implement. The production backend is [`DuckDuckGoProvider`];
//! [`mock::MockSearchProvider`] is available for tests.

mod duckduckgo;

pub mod mock;

pub use duckduckgo::DuckDuckGoProvider;
pub use mock::MockSearchProvider;

use async_trait::async_trait;

/// One URL returned by search, representing an unverified source to try.
///
/// Ordering from the provider is preserved and is the only priority signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Opaque URL naming a network resource
    pub url: String,
}

impl Candidate {
    /// Create a new candidate
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// The SearchProvider trait defines the interface for web search backends.
#[async_trait]
pub trait SearchProvider: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this provider (e.g., "duckduckgo")
    fn id(&self) -> &str;

    /// Human-readable name of this provider
    fn name(&self) -> &str;

    /// Search for candidate URLs matching the query.
    ///
    /// Returns at most `limit` candidates in provider ranking order. An empty
    /// result is a normal outcome, distinct from a provider error.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, SearchError>;
}

/// Errors that can occur when querying a search provider
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Network or HTTP error reaching the provider
    #[error("network error: {0}")]
    Network(String),

    /// Provider returned an unparseable result page
    #[error("failed to parse search results: {0}")]
    Parse(String),

    /// Provider-side error (rate limit, blocked request, API fault)
    #[error("search provider error: {0}")]
    Provider(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Network(err.to_string())
    }
}
