//! Core data models for papers and search operations.

mod paper;
mod search;

pub use paper::{abs_url, Paper, PaperBuilder, ARXIV_ABS_URL, DEFAULT_JOURNAL};
pub use search::{QueryError, SearchQuery, SearchRequest, SearchResult, MIN_QUERY_CHARS};
