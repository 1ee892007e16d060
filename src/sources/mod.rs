//! Upstream paper sources.
//!
//! A [`PaperSource`] turns a validated [`SearchQuery`] into normalized papers
//! with a single upstream round trip. [`ArxivSource`] is the production
//! implementation; [`MockSource`] is a scripted stand-in for tests.

pub mod arxiv;
pub mod mock;

pub use arxiv::ArxivSource;
pub use mock::MockSource;

use crate::models::{Paper, SearchQuery};
use async_trait::async_trait;

/// Interface for an upstream search API
#[async_trait]
pub trait PaperSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "arxiv")
    fn id(&self) -> &str;

    /// Search for papers matching the query, in upstream order
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Paper>, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// Network or transport error, including timeouts
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered with a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// The response body was not a readable feed
    #[error("Failed to parse XML response: {0}")]
    Feed(#[from] arxiv::FeedError),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::arxiv::FeedError;

    #[test]
    fn test_source_error_messages() {
        let err = SourceError::from(FeedError::NoRoot);
        assert_eq!(
            err.to_string(),
            "Failed to parse XML response: document has no root element"
        );
        assert_eq!(
            SourceError::Api("arXiv API returned status: 500".into()).to_string(),
            "API error: arXiv API returned status: 500"
        );
    }
}
