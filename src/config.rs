//! # Client Configuration Module
//!
//! Everything a [`PortalClient`](crate::client::PortalClient) needs: which
//! provider to talk to, how to reach it and, for the student API, whose
//! session to use.
//!
//! ## Environment
//!
//! `ClientConfig::from_env` reads:
//!
//! - `CAMPUS_HARVEST_STUDENT_ID` and `CAMPUS_HARVEST_TOKEN`: session for the student API
//! - `CAMPUS_HARVEST_CERT_DIR`: directory of extra PEM trust roots
//! - `CAMPUS_HARVEST_TIMEOUT_SECS`: total request timeout
//! - `CAMPUS_HARVEST_WEBSITE_URL` / `CAMPUS_HARVEST_API_URL`: endpoint overrides

use std::env;
use std::fmt;
use std::path::PathBuf;

use tracing::warn;

use crate::fetch::FetcherConfig;
use crate::provider::ProviderConfig;

/// An authenticated student session
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub student_id: String,
    pub token: String,
}

impl Session {
    pub fn new(student_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("student_id", &self.student_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Configuration for the portal client
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub provider: ProviderConfig,
    pub fetcher: FetcherConfig,
    pub session: Option<Session>,
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn provider(mut self, provider: ProviderConfig) -> Self {
        self.config.provider = provider;
        self
    }

    pub fn fetcher(mut self, fetcher: FetcherConfig) -> Self {
        self.config.fetcher = fetcher;
        self
    }

    /// Override the public website URL
    pub fn website_url(mut self, url: impl Into<String>) -> Self {
        self.config.provider.website_url = url.into();
        self
    }

    /// Override the student API URL
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.provider.api_url = url.into();
        self
    }

    pub fn session(mut self, student_id: impl Into<String>, token: impl Into<String>) -> Self {
        self.config.session = Some(Session::new(student_id, token));
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetcher.timeout_secs = secs;
        self
    }

    pub fn cert_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.fetcher.cert_dir = Some(dir.into());
        self
    }

    pub fn requests_per_minute(mut self, rpm: u32) -> Self {
        self.config.fetcher.requests_per_minute = Some(rpm);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl ClientConfig {
    /// Create a new builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Build a configuration from `CAMPUS_HARVEST_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut builder = ClientConfigBuilder::new();

        match (get("CAMPUS_HARVEST_STUDENT_ID"), get("CAMPUS_HARVEST_TOKEN")) {
            (Some(student_id), Some(token)) => builder = builder.session(student_id, token),
            (None, Some(_)) => warn!("CAMPUS_HARVEST_TOKEN is set without CAMPUS_HARVEST_STUDENT_ID, ignoring it"),
            _ => {}
        }

        if let Some(dir) = get("CAMPUS_HARVEST_CERT_DIR") {
            builder = builder.cert_dir(dir);
        }

        if let Some(raw) = get("CAMPUS_HARVEST_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => builder = builder.timeout_secs(secs),
                _ => warn!("Ignoring invalid CAMPUS_HARVEST_TIMEOUT_SECS value '{}'", raw),
            }
        }

        if let Some(url) = get("CAMPUS_HARVEST_WEBSITE_URL") {
            builder = builder.website_url(url);
        }
        if let Some(url) = get("CAMPUS_HARVEST_API_URL") {
            builder = builder.api_url(url);
        }

        builder.build()
    }
}
