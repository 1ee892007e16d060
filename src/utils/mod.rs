//! Utility modules supporting the search pipeline.
//!
//! - [`HttpClient`]: shared reqwest client with a bounded request timeout
//! - [`clean_text`]: whitespace normalization for upstream text fields
//! - [`last_path_segment`]: identifier extraction from entry URLs

mod http;
mod text;

pub use http::{HttpClient, DEFAULT_TIMEOUT_SECS};
pub use text::{clean_optional, clean_text, last_path_segment};
