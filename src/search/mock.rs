//! Mock search provider for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::search::{Candidate, SearchError, SearchProvider};

/// A mock provider that returns predefined candidates and records queries.
#[derive(Debug, Default)]
pub struct MockSearchProvider {
    candidates: Mutex<Vec<Candidate>>,
    queries: Mutex<Vec<String>>,
    fail: Mutex<bool>,
}

impl MockSearchProvider {
    /// Create a new mock provider with no candidates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider returning the given URLs, in order.
    pub fn with_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new();
        provider.set_candidates(urls.into_iter().map(Candidate::new).collect());
        provider
    }

    /// Set the candidates to return.
    pub fn set_candidates(&self, candidates: Vec<Candidate>) {
        *self.candidates.lock().unwrap() = candidates;
    }

    /// Make the next search calls fail with a provider error.
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// Queries received so far, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Provider"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());

        if *self.fail.lock().unwrap() {
            return Err(SearchError::Provider("mock failure".to_string()));
        }

        let candidates = self.candidates.lock().unwrap();
        Ok(candidates.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_queries_and_limits() {
        let provider = MockSearchProvider::with_urls(["http://a", "http://b", "http://c"]);

        let results = provider.search("ne555 datasheet", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "http://a");
        assert_eq!(provider.queries(), vec!["ne555 datasheet".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let provider = MockSearchProvider::new();
        provider.set_failing(true);

        assert!(provider.search("anything", 5).await.is_err());
    }
}
