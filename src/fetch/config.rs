//! # Fetcher Configuration Module
//!
//! Transport settings for [`HttpFetcher`](super::HttpFetcher), configured once
//! at client construction. The extraction pipeline never reads them.
//!
//! ## Features
//!
//! - Connect and total request timeouts
//! - Retry on connection failure (`max_tries`)
//! - Optional politeness quota in requests per minute
//! - Extra PEM trust roots loaded from a directory, on top of the system store

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Total request timeout in seconds
    pub timeout_secs: u64,

    /// Number of attempts when the connection itself fails
    pub max_tries: u32,

    /// Maximum requests per minute, unlimited when `None`
    pub requests_per_minute: Option<u32>,

    /// User agent to use for requests
    pub user_agent: String,

    /// Directory of PEM certificates added to the system trust store
    pub cert_dir: Option<PathBuf>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            timeout_secs: 30,
            max_tries: 3,
            requests_per_minute: None,
            user_agent: format!("campus-harvest/{}", env!("CARGO_PKG_VERSION")),
            cert_dir: None,
        }
    }
}

/// Builder for FetcherConfig
#[derive(Debug, Default)]
pub struct FetcherConfigBuilder {
    config: FetcherConfig,
}

impl FetcherConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: FetcherConfig::default(),
        }
    }

    /// Set the connect timeout in seconds
    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    /// Set the total request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Set the number of attempts on connection failure (at least one)
    pub fn max_tries(mut self, max_tries: u32) -> Self {
        self.config.max_tries = max_tries.max(1);
        self
    }

    /// Limit the number of requests per minute
    pub fn requests_per_minute(mut self, rpm: u32) -> Self {
        self.config.requests_per_minute = Some(rpm);
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Load extra trust roots from this directory
    pub fn cert_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cert_dir = Some(dir.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> FetcherConfig {
        self.config
    }
}

impl FetcherConfig {
    /// Create a new builder
    pub fn builder() -> FetcherConfigBuilder {
        FetcherConfigBuilder::new()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
