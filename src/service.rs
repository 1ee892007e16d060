//! Paper search orchestration.
//!
//! [`PaperService::search_papers`] validates the raw query, makes exactly one
//! upstream call and assembles the [`SearchResult`]. It keeps no state between
//! requests.

use std::sync::Arc;

use crate::models::{QueryError, SearchQuery, SearchResult};
use crate::sources::{PaperSource, SourceError};

/// Failure kinds visible to callers of the service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The caller's input was rejected before any upstream contact
    #[error("Validation error: {0}")]
    Validation(String),

    /// The upstream API could not be reached or returned an unusable response
    #[error("arXiv API error: {0}")]
    Upstream(#[from] SourceError),

    /// Anything else
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<QueryError> for ServiceError {
    fn from(err: QueryError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

/// Search orchestrator over a single upstream source
#[derive(Debug, Clone)]
pub struct PaperService {
    source: Arc<dyn PaperSource>,
}

impl PaperService {
    pub fn new(source: Arc<dyn PaperSource>) -> Self {
        Self { source }
    }

    /// Validate `raw_query`, search upstream and assemble the result
    pub async fn search_papers(&self, raw_query: &str) -> Result<SearchResult, ServiceError> {
        let query = SearchQuery::parse(raw_query)?;

        let papers = self.source.search(&query).await.map_err(|e| {
            tracing::warn!(source = self.source.id(), query = %query, error = %e, "Upstream search failed");
            ServiceError::Upstream(e)
        })?;

        let result = SearchResult::new(papers, query);
        tracing::info!(
            source = self.source.id(),
            query = %result.query,
            total_results = result.total_results,
            "Search completed"
        );
        Ok(result)
    }
}
