//! Error types for the campus-harvest crate
//!
//! Every module keeps its own `thiserror` enum (`FetchError`, `ExtractError`,
//! `DateParseError`) and converts into the crate-level [`Error`] at the
//! boundary. Callers only ever see one classified error per operation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fetch::FetchError;

/// Result type for campus-harvest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Sub-classification of an invalid response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseKind {
    /// The body was not the JSON shape we expected
    Json,
    /// The markup could not be turned into records
    Html,
    /// The portal answered with a maintenance page
    Maintenance,
    /// The portal is throttling us
    RateLimit,
    /// TLS negotiation or certificate validation failed
    Ssl,
    /// Anything else
    Generic,
}

impl ResponseKind {
    /// Short label used as the message prefix of aggregate failures
    pub fn label(&self) -> &'static str {
        match self {
            ResponseKind::Json => "invalid JSON",
            ResponseKind::Html => "invalid HTML",
            ResponseKind::Maintenance => "maintenance",
            ResponseKind::RateLimit => "rate limited",
            ResponseKind::Ssl => "SSL error",
            ResponseKind::Generic => "invalid response",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseKind::Json => "json",
            ResponseKind::Html => "html",
            ResponseKind::Maintenance => "maintenance",
            ResponseKind::RateLimit => "rate-limit",
            ResponseKind::Ssl => "ssl",
            ResponseKind::Generic => "generic",
        };
        f.write_str(name)
    }
}

/// Error type for campus-harvest operations
#[derive(Debug, Error)]
pub enum Error {
    /// Network or connection failure, always propagated
    #[error("Transport error: {0}")]
    Transport(FetchError),

    /// The portal answered, but the answer could not be used
    #[error("Invalid response ({kind}): {message}")]
    InvalidResponse {
        /// Classification of the failure
        kind: ResponseKind,
        /// Human readable description, names the dominant reason for aggregate failures
        message: String,
        /// Underlying cause, attached only when a single root cause is known
        #[source]
        source: Option<Box<Error>>,
    },

    /// Missing or rejected session credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The selected provider does not offer this feature
    #[error("Feature not supported by provider: {0}")]
    FeatureNotSupported(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A selector or pointer in a rule set could not be compiled
    #[error("Invalid extraction rule: {0}")]
    InvalidRule(String),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build an invalid-response error without a cause
    pub fn invalid_response(kind: ResponseKind, message: impl Into<String>) -> Self {
        Error::InvalidResponse {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach a cause to an invalid-response error. Other variants are returned unchanged.
    pub fn with_cause(self, cause: Error) -> Self {
        match self {
            Error::InvalidResponse { kind, message, .. } => Error::InvalidResponse {
                kind,
                message,
                source: Some(Box::new(cause)),
            },
            other => other,
        }
    }

    /// Classification of an invalid response, if this is one
    pub fn response_kind(&self) -> Option<ResponseKind> {
        match self {
            Error::InvalidResponse { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_html_error(&self) -> bool {
        self.response_kind() == Some(ResponseKind::Html)
    }

    pub fn is_json_error(&self) -> bool {
        self.response_kind() == Some(ResponseKind::Json)
    }

    pub fn is_rate_limit(&self) -> bool {
        self.response_kind() == Some(ResponseKind::RateLimit)
    }

    pub fn is_maintenance(&self) -> bool {
        self.response_kind() == Some(ResponseKind::Maintenance)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_response_display() {
        let err = Error::invalid_response(ResponseKind::Html, "invalid HTML: reason: missing-field");
        assert_eq!(
            err.to_string(),
            "Invalid response (html): invalid HTML: reason: missing-field"
        );
        assert!(err.is_html_error());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_with_cause_sets_source() {
        let err = Error::invalid_response(ResponseKind::Html, "invalid HTML")
            .with_cause(Error::Other("missing title".to_string()));

        let source = err.source().expect("cause should be attached");
        assert_eq!(source.to_string(), "missing title");
    }

    #[test]
    fn test_with_cause_ignores_other_variants() {
        let err = Error::InvalidRequest("bad".to_string()).with_cause(Error::Other("x".into()));
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(err.response_kind().is_none());
    }
}
