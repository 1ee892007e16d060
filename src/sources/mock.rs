//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::{Paper, PaperBuilder, SearchQuery};
use crate::sources::{PaperSource, SourceError};

/// A mock source that returns a scripted response and counts calls.
#[derive(Debug, Default)]
pub struct MockSource {
    response: Mutex<Option<Result<Vec<Paper>, SourceError>>>,
    calls: AtomicUsize,
    last_query: Mutex<Option<String>>,
}

impl MockSource {
    /// Create a mock that returns no papers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that returns the given papers
    pub fn with_papers(papers: Vec<Paper>) -> Self {
        let mock = Self::new();
        mock.set_response(Ok(papers));
        mock
    }

    /// Create a mock that fails with the given error
    pub fn failing(error: SourceError) -> Self {
        let mock = Self::new();
        mock.set_response(Err(error));
        mock
    }

    /// Set the response to return
    pub fn set_response(&self, response: Result<Vec<Paper>, SourceError>) {
        if let Ok(mut guard) = self.response.lock() {
            *guard = Some(response);
        }
    }

    /// Number of times `search` was called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The query passed to the most recent `search` call
    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl PaperSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Paper>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_query.lock() {
            *guard = Some(query.to_string());
        }

        let guard = self
            .response
            .lock()
            .map_err(|e| SourceError::Other(format!("mock lock poisoned: {}", e)))?;
        match &*guard {
            Some(response) => response.clone(),
            None => Ok(Vec::new()),
        }
    }
}

/// Helper function to create a mock paper for testing.
pub fn make_paper(id: &str, title: &str) -> Paper {
    PaperBuilder::new(id)
        .title(title)
        .authors(vec!["Test Author".to_string()])
        .published_date("2024-01-01T00:00:00Z")
        .build()
}
