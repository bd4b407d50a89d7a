//! # Fetch Module
//!
//! The transport collaborator of the extraction pipeline. The pipeline only
//! sees the [`Fetcher`] trait: one GET with query parameters, answered by a
//! [`Page`] (body plus effective final URL) or a [`FetchError`].
//!
//! ## Key Components
//!
//! - `Fetcher`: the narrow interface consumed by the pipeline
//! - `HttpFetcher`: reqwest-backed implementation with timeouts, retry on
//!   connect failure, an optional politeness quota and extra trust roots
//! - `MockFetcher`: in-memory implementation for tests and offline runs
//! - `FetcherConfig`: builder-style transport configuration

mod client;
mod config;
mod error;
pub mod mock;

pub use client::{HttpFetcher, load_root_certificates};
pub use config::{FetcherConfig, FetcherConfigBuilder};
pub use error::FetchError;
pub use mock::MockFetcher;

use std::future::Future;
use url::Url;

/// A single GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Target URL, without the query parameters below
    pub url: Url,

    /// Query parameters appended in order
    pub query: Vec<(String, String)>,
}

impl FetchRequest {
    /// Create a GET request for the given URL
    pub fn get(url: Url) -> Self {
        Self {
            url,
            query: Vec::new(),
        }
    }

    /// Append a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// The URL with every query parameter applied
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        url
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct Page {
    /// Effective final URL, used to resolve relative links
    pub url: Url,

    /// HTTP status code
    pub status: u16,

    /// Response body as text
    pub body: String,
}

/// Transport used by the extraction pipeline
///
/// Implementations own their retry policy. A returned error is a terminal
/// outcome for the page or item that requested it.
pub trait Fetcher {
    /// Perform one GET request
    fn fetch(&self, request: FetchRequest) -> impl Future<Output = Result<Page, FetchError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url_appends_query() {
        let request = FetchRequest::get(Url::parse("https://portal.test/en/news").unwrap())
            .param("page", "2")
            .param("q", "open day");

        assert_eq!(
            request.full_url().as_str(),
            "https://portal.test/en/news?page=2&q=open+day"
        );
    }

    #[test]
    fn test_full_url_without_query() {
        let request = FetchRequest::get(Url::parse("https://portal.test/it/newsletter").unwrap());
        assert_eq!(request.full_url().as_str(), "https://portal.test/it/newsletter");
    }
}
