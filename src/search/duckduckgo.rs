//! DuckDuckGo search provider.
//!
//! DuckDuckGo has no public JSON API, so we query the HTML endpoint and
//! parse the result page with `scraper`. Result links point at a redirect
//! (`/l/?uddg=<encoded>`); the real target is recovered from the `uddg`
//! query parameter.

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use crate::search::{Candidate, SearchError, SearchProvider};

/// HTML search endpoint (the JS-free variant of the result page)
const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo web search provider
#[derive(Debug, Clone)]
pub struct DuckDuckGoProvider {
    client: reqwest::Client,
}

impl DuckDuckGoProvider {
    /// Create a new provider with its own HTTP client
    pub fn new() -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SearchError::Provider(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn id(&self) -> &str {
        "duckduckgo"
    }

    fn name(&self) -> &str {
        "DuckDuckGo"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, SearchError> {
        let response = self
            .client
            .get(DDG_HTML_URL)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Provider(format!(
                "search endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        Ok(extract_result_urls(&body, limit))
    }
}

/// Pull result links out of a DuckDuckGo HTML result page, in page order.
fn extract_result_urls(body: &str, limit: usize) -> Vec<Candidate> {
    let document = Html::parse_document(body);

    let selector = match Selector::parse("a.result__a") {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = ?e, "invalid result selector");
            return Vec::new();
        }
    };

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(resolve_result_href)
        .take(limit)
        .map(Candidate::new)
        .collect()
}

/// Resolve one result href to its target URL.
///
/// Links come back either absolute or scheme-relative, and usually route
/// through the `/l/?uddg=<encoded>` redirect endpoint.
fn resolve_result_href(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;

    if parsed.path() == "/l/" {
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned());
    }

    Some(parsed.to_string())
}
