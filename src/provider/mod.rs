//! # Provider Configuration
//!
//! Describes one portal: where it lives, which features it offers and the
//! extraction rules of its pages. The pipeline is provider-agnostic; every
//! selector, pointer and date pattern comes from here.
//!
//! ## Key Components
//!
//! - `ProviderConfig`: endpoints and feature flags
//! - `Features`: the capability gate checked by the client
//! - `sapienza`: rule tables of the Sapienza portal

pub mod sapienza;

use url::Url;

use crate::error::Result;

/// Features a provider offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub news: bool,
    pub exams: bool,
    pub taxes: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            news: true,
            exams: true,
            taxes: true,
        }
    }
}

/// Endpoints and capabilities of one portal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Provider name used in logs
    pub name: String,

    /// Public website hosting news and events
    pub website_url: String,

    /// Base URL of the student API
    pub api_url: String,

    /// Query parameter carrying the session token
    pub token_param: String,

    pub features: Features,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "sapienza".to_string(),
            website_url: "https://www.uniroma1.it".to_string(),
            api_url: "https://www.studenti.uniroma1.it/phoenixws".to_string(),
            token_param: "ingresso".to_string(),
            features: Features::default(),
        }
    }
}

/// Builder for ProviderConfig
#[derive(Debug, Default)]
pub struct ProviderConfigBuilder {
    config: ProviderConfig,
}

impl ProviderConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ProviderConfig::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn website_url(mut self, url: impl Into<String>) -> Self {
        self.config.website_url = url.into();
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn token_param(mut self, name: impl Into<String>) -> Self {
        self.config.token_param = name.into();
        self
    }

    pub fn features(mut self, features: Features) -> Self {
        self.config.features = features;
        self
    }

    pub fn build(self) -> ProviderConfig {
        self.config
    }
}

impl ProviderConfig {
    pub fn builder() -> ProviderConfigBuilder {
        ProviderConfigBuilder::new()
    }

    /// A page of the public website
    pub fn website(&self, path: &str) -> Result<Url> {
        join(&self.website_url, path)
    }

    /// An endpoint of the student API
    pub fn api(&self, path: &str) -> Result<Url> {
        join(&self.api_url, path)
    }
}

fn join(base: &str, path: &str) -> Result<Url> {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{}/{}", base, path))?)
}
