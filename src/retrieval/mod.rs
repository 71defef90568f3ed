//! Fallback-chain document retrieval.
//!
//! [`RetrievalPipeline`] orchestrates search -> fetch -> convert across the
//! candidate list, returning the first usable text. Per-candidate failures
//! are absorbed locally; every path terminates in a string result.

mod convert;
mod fetch;

pub use convert::{truncate_pdf, ConvertError, DocumentConverter, PdfConverter};
pub use fetch::{DocumentFetcher, FetchError, HttpFetcher};

use std::sync::Arc;

use crate::search::SearchProvider;

/// User-visible message when the search provider itself fails
pub const SEARCH_FAILED_MESSAGE: &str = "Error during search. Please try again.";

/// User-visible message when no candidate yields usable text
pub const NOT_FOUND_MESSAGE: &str = "No suitable datasheet found online for this component. \
     Please try a more specific query or a different component.";

/// Retrieval pipeline: search, then try candidates strictly in order.
#[derive(Debug)]
pub struct RetrievalPipeline {
    provider: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn DocumentFetcher>,
    converter: Arc<dyn DocumentConverter>,
    max_candidates: usize,
}

impl RetrievalPipeline {
    /// Create a new pipeline
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn DocumentFetcher>,
        converter: Arc<dyn DocumentConverter>,
        max_candidates: usize,
    ) -> Self {
        Self {
            provider,
            fetcher,
            converter,
            max_candidates,
        }
    }

    /// Retrieve text for the query, extracting at most `max_pages` pages.
    ///
    /// Candidates are tried sequentially, never concurrently, so a single
    /// call holds at most one document in memory and does not hammer
    /// multiple hosts. The first successful non-empty conversion wins;
    /// everything else falls through to a fixed message.
    pub async fn retrieve(&self, query: &str, max_pages: usize) -> String {
        tracing::info!(provider = self.provider.id(), query, "searching for documents");

        let candidates = match self.provider.search(query, self.max_candidates).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::error!(query, error = %e, "search failed");
                return SEARCH_FAILED_MESSAGE.to_string();
            }
        };

        tracing::info!(query, count = candidates.len(), "search returned candidates");

        for candidate in &candidates {
            tracing::info!(url = %candidate.url, "attempting download");

            let bytes = match self.fetcher.get(&candidate.url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(url = %candidate.url, error = %e, "download failed");
                    continue;
                }
            };

            match self.converter.convert(&bytes, max_pages) {
                Ok(text) if !text.trim().is_empty() => {
                    tracing::info!(url = %candidate.url, "successfully converted document");
                    return text;
                }
                Ok(_) => {
                    tracing::warn!(url = %candidate.url, "document converted to empty text");
                }
                Err(e) => {
                    tracing::warn!(url = %candidate.url, error = %e, "conversion failed");
                }
            }
        }

        tracing::warn!(query, "no candidate yielded usable text");
        NOT_FOUND_MESSAGE.to_string()
    }
}
