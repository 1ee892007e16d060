//! Text normalization for upstream fields.

/// Collapse every run of whitespace into a single space and trim both ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Like [`clean_text`], but an absent value becomes an empty string.
pub fn clean_optional(text: Option<&str>) -> String {
    text.map(clean_text).unwrap_or_default()
}

/// Last `/`-delimited segment of an identifier URL.
///
/// `"http://arxiv.org/abs/2301.12345v1"` yields `"2301.12345v1"`. A trailing
/// slash yields an empty segment, matching a plain split.
pub fn last_path_segment(identifier: &str) -> &str {
    identifier.rsplit('/').next().unwrap_or_default()
}
