//! # Mock Fetcher for Testing
//!
//! Provides a `MockFetcher` that implements the `Fetcher` trait from a table
//! of canned responses keyed by full URL (query included). Every request is
//! recorded so tests can check which pages were, and were not, fetched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use url::Url;

use super::{FetchError, FetchRequest, Fetcher, Page};

#[derive(Debug, Clone)]
enum MockResponse {
    Body(String),
    Status(u16),
    Unreachable,
}

/// A fetcher answering from an in-memory table
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    responses: HashMap<String, MockResponse>,
    requests: Arc<Mutex<Vec<String>>>,
}

fn normalize(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

impl MockFetcher {
    /// Creates an empty mock; unknown URLs answer 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 for `url`
    pub fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.responses
            .insert(normalize(url), MockResponse::Body(body.into()));
        self
    }

    /// Answer `url` with an HTTP error status
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(normalize(url), MockResponse::Status(status));
        self
    }

    /// Fail `url` as if the host could not be reached
    pub fn with_unreachable(mut self, url: &str) -> Self {
        self.responses
            .insert(normalize(url), MockResponse::Unreachable);
        self
    }

    /// Every URL requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn respond(&self, request: &FetchRequest) -> Result<Page, FetchError> {
        let url = request.full_url();
        let key = url.to_string();
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(key.clone());
        }

        match self.responses.get(&key) {
            Some(MockResponse::Body(body)) => Ok(Page {
                url,
                status: 200,
                body: body.clone(),
            }),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                status: *status,
                url: key,
            }),
            Some(MockResponse::Unreachable) => {
                Err(FetchError::Connection(format!("{} is unreachable", key)))
            }
            None => Err(FetchError::Status {
                status: 404,
                url: key,
            }),
        }
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<Page, FetchError> {
        self.respond(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_fetcher_responses() {
        let fetcher = MockFetcher::new()
            .with_page("https://portal.test/news?page=0", "<p>ok</p>")
            .with_status("https://portal.test/busy", 503)
            .with_unreachable("https://portal.test/down");

        let ok = fetcher
            .fetch(FetchRequest::get(Url::parse("https://portal.test/news").unwrap()).param("page", "0"))
            .await
            .unwrap();
        assert_eq!(ok.body, "<p>ok</p>");

        let busy = fetcher
            .fetch(FetchRequest::get(Url::parse("https://portal.test/busy").unwrap()))
            .await;
        assert!(matches!(busy, Err(FetchError::Status { status: 503, .. })));

        let down = fetcher
            .fetch(FetchRequest::get(Url::parse("https://portal.test/down").unwrap()))
            .await;
        assert!(matches!(down, Err(FetchError::Connection(_))));

        let unknown = fetcher
            .fetch(FetchRequest::get(Url::parse("https://portal.test/other").unwrap()))
            .await;
        assert!(matches!(unknown, Err(FetchError::Status { status: 404, .. })));

        assert_eq!(
            fetcher.requests(),
            vec![
                "https://portal.test/news?page=0",
                "https://portal.test/busy",
                "https://portal.test/down",
                "https://portal.test/other",
            ]
        );
    }
}
