//! Error types for the extract module

use crate::error::{Error as CrateError, ResponseKind};
use thiserror::Error;

/// Error type for extraction operations
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A CSS selector of a rule set did not compile
    #[error("Invalid selector {0}")]
    Selector(String),

    /// A JSON pointer of a rule set is malformed
    #[error("Invalid JSON pointer '{0}'")]
    Pointer(String),

    /// Nothing to parse
    #[error("Empty document from {0}")]
    EmptyDocument(String),

    /// The body is not JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is valid but not shaped as the rule set expects
    #[error("Unexpected JSON shape: {0}")]
    UnexpectedShape(String),
}

impl From<ExtractError> for CrateError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Selector(_) | ExtractError::Pointer(_) => {
                CrateError::InvalidRule(err.to_string())
            }
            ExtractError::EmptyDocument(_) => {
                CrateError::invalid_response(ResponseKind::Html, err.to_string())
            }
            ExtractError::Json(_) | ExtractError::UnexpectedShape(_) => {
                CrateError::invalid_response(ResponseKind::Json, err.to_string())
            }
        }
    }
}
