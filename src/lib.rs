//! # Paper Glimpse
//!
//! An HTTP service that searches arXiv and returns normalized paper records.
//!
//! ## Architecture
//!
//! - [`models`]: Paper, validated search query and search result types
//! - [`sources`]: Upstream source trait and the arXiv implementation, including
//!   the Atom feed parser
//! - [`service`]: Search orchestration (validate, fetch, assemble)
//! - [`server`]: axum router and HTTP handlers
//! - [`utils`]: HTTP client and text normalization
//! - [`config`]: Configuration management

pub mod config;
pub mod models;
pub mod server;
pub mod service;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::{Paper, SearchQuery, SearchResult};
pub use service::{PaperService, ServiceError};
pub use sources::{ArxivSource, PaperSource, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
