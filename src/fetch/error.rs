//! Error types for the fetch module

use crate::error::{Error as CrateError, ResponseKind};
use thiserror::Error;

/// Error type for fetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("Unexpected status {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Final URL of the request
        url: String,
    },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Could not connect to the server
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request did not complete in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// TLS handshake or certificate validation failed
    #[error("TLS error: {0}")]
    Tls(String),

    /// A trust-store certificate could not be loaded
    #[error("Certificate error: {0}")]
    Certificate(String),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl FetchError {
    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<FetchError> for CrateError {
    fn from(err: FetchError) -> Self {
        match err.status() {
            Some(429) => CrateError::invalid_response(ResponseKind::RateLimit, err.to_string()),
            Some(503) => CrateError::invalid_response(ResponseKind::Maintenance, err.to_string()),
            Some(401) => CrateError::InvalidCredentials(err.to_string()),
            _ => match err {
                FetchError::Tls(msg) => CrateError::invalid_response(ResponseKind::Ssl, msg),
                FetchError::Certificate(msg) => CrateError::Other(format!("Certificate error: {}", msg)),
                other => CrateError::Transport(other),
            },
        }
    }
}
