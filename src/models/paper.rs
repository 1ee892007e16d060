//! Paper model returned to API callers.

use serde::{Deserialize, Serialize};

/// Landing page prefix for arXiv papers
pub const ARXIV_ABS_URL: &str = "https://arxiv.org/abs/";

/// Journal value used when an entry carries no primary category
pub const DEFAULT_JOURNAL: &str = "arXiv";

/// A normalized research paper record
///
/// Every field is always populated: text fields fall back to an empty string
/// and `journal` falls back to [`DEFAULT_JOURNAL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// arXiv identifier, e.g. `2301.12345v1`
    pub id: String,

    /// Paper title, whitespace-normalized
    pub title: String,

    /// Author names in feed order
    pub authors: Vec<String>,

    /// Abstract text, whitespace-normalized
    pub r#abstract: String,

    /// Upstream publication timestamp, unmodified
    pub published_date: String,

    /// Primary category term
    pub journal: String,

    /// Abstract page URL
    pub url: String,
}

impl Paper {
    /// Create a paper with the given id and every other field defaulted
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            url: abs_url(&id),
            id,
            title: String::new(),
            authors: Vec::new(),
            r#abstract: String::new(),
            published_date: String::new(),
            journal: DEFAULT_JOURNAL.to_string(),
        }
    }
}

/// Abstract page URL for an arXiv id. An empty id still yields the bare prefix.
pub fn abs_url(id: &str) -> String {
    format!("{}{}", ARXIV_ABS_URL, id)
}

/// Builder for constructing Paper objects
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Start a builder for the given id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            paper: Paper::new(id),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.paper.title = title.into();
        self
    }

    pub fn authors(mut self, authors: Vec<String>) -> Self {
        self.paper.authors = authors;
        self
    }

    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.paper.r#abstract = abstract_text.into();
        self
    }

    pub fn published_date(mut self, date: impl Into<String>) -> Self {
        self.paper.published_date = date.into();
        self
    }

    /// Set the journal; `None` keeps the default
    pub fn journal(mut self, journal: Option<String>) -> Self {
        if let Some(journal) = journal {
            self.paper.journal = journal;
        }
        self
    }

    pub fn build(self) -> Paper {
        self.paper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_defaults() {
        let paper = Paper::new("");
        assert_eq!(paper.id, "");
        assert_eq!(paper.url, "https://arxiv.org/abs/");
        assert_eq!(paper.journal, "arXiv");
        assert!(paper.authors.is_empty());
    }

    #[test]
    fn test_builder() {
        let paper = PaperBuilder::new("2301.12345v1")
            .title("Title")
            .authors(vec!["A".to_string(), "B".to_string()])
            .abstract_text("Abstract")
            .published_date("2023-01-15T10:00:00Z")
            .journal(Some("cs.LG".to_string()))
            .build();

        assert_eq!(paper.url, "https://arxiv.org/abs/2301.12345v1");
        assert_eq!(paper.journal, "cs.LG");
        assert_eq!(paper.authors, vec!["A", "B"]);
    }

    #[test]
    fn test_builder_keeps_default_journal() {
        let paper = PaperBuilder::new("x").journal(None).build();
        assert_eq!(paper.journal, DEFAULT_JOURNAL);
    }

    #[test]
    fn test_serializes_abstract_field_name() {
        let json = serde_json::to_value(Paper::new("1")).unwrap();
        assert!(json.get("abstract").is_some());
        assert_eq!(json["url"], "https://arxiv.org/abs/1");
        assert_eq!(json["authors"], serde_json::json!([]));
    }
}
