//! arXiv research source implementation.

pub mod feed;

use async_trait::async_trait;
use std::time::Duration;

use crate::config::ArxivConfig;
use crate::models::{Paper, SearchQuery};
use crate::sources::{PaperSource, SourceError};
use crate::utils::HttpClient;

pub use feed::{parse_entries, parse_feed, EntryError, FeedError, RawFeedEntry};

/// Base URL for arXiv API
pub const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

/// Default cap on returned entries
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// arXiv research source
///
/// Holds only immutable settings and a shared HTTP client, so one instance can
/// serve any number of concurrent searches.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: HttpClient,
    base_url: String,
    max_results: usize,
}

impl ArxivSource {
    /// Create a new arXiv source with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&ArxivConfig::default())
    }

    /// Create a source from the `[arxiv]` configuration section
    pub fn from_config(config: &ArxivConfig) -> Result<Self, SourceError> {
        let client = HttpClient::with_timeout(Duration::from_secs(config.timeout_seconds))?;
        Ok(Self::with_client(
            client,
            config.base_url.clone(),
            config.max_results,
        ))
    }

    /// Create with a custom HTTP client (for testing)
    pub fn with_client(client: HttpClient, base_url: impl Into<String>, max_results: usize) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            max_results,
        }
    }

    /// Build the full query URL for a keyword
    ///
    /// Spaces become `+`; every other character is embedded as-is.
    pub fn build_query_url(&self, keyword: &str) -> String {
        format!(
            "{}?search_query=all:{}&sortBy=submittedDate&sortOrder=descending&max_results={}",
            self.base_url,
            keyword.replace(' ', "+"),
            self.max_results
        )
    }

    /// Fetch the raw feed body for a query
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/atom+xml")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Network(format!("Request to arXiv timed out: {}", e))
                } else {
                    SourceError::Network(format!("Failed to fetch arXiv results: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Api(format!(
                "arXiv API returned status: {}",
                status
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PaperSource for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Paper>, SourceError> {
        let url = self.build_query_url(query.as_str());
        tracing::debug!(%url, "Querying arXiv");

        let body = self.fetch(&url).await?;
        let papers = parse_feed(&body)?;

        tracing::debug!(count = papers.len(), "Parsed arXiv feed");
        Ok(papers)
    }
}
