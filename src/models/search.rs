//! Search request and response models.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Paper;

/// Minimum query length, in characters, after trimming
pub const MIN_QUERY_CHARS: usize = 2;

/// Reasons a raw query string is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Query cannot be empty")]
    Empty,

    #[error("Query must be at least 2 characters long")]
    TooShort,
}

/// A validated search query: trimmed and at least [`MIN_QUERY_CHARS`] long
///
/// The only way to obtain one is [`SearchQuery::parse`], so anything holding a
/// `SearchQuery` can assume it is usable upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Trim and validate a raw query
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return Err(QueryError::TooShort);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /api/v1/papers/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// Search results returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Papers that survived parsing, in feed order
    pub papers: Vec<Paper>,

    /// Number of papers returned (not upstream's total match count)
    pub total_results: usize,

    /// The trimmed query
    pub query: String,
}

impl SearchResult {
    /// Build a result; `total_results` is derived from `papers`
    pub fn new(papers: Vec<Paper>, query: SearchQuery) -> Self {
        Self {
            total_results: papers.len(),
            papers,
            query: query.into_inner(),
        }
    }
}
