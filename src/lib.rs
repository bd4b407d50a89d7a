//! # campus-harvest - Resilient Content Extraction for University Portals
//!
//! This crate turns the pages and API answers of a university portal into
//! typed records (news, events, exams, reservations and taxes). Portal
//! markup is frequently partial or malformed, so extraction is built to
//! recover item by item and to report one classified error only when nothing
//! usable came back.
//!
//! ## Features
//!
//! - Data-driven extraction rules (CSS selectors and JSON pointers)
//! - Pagination with record limits and per-item detail enrichment
//! - Failure aggregation with a dominant-reason verdict
//! - Locale-aware date parsing with ordered fallback patterns
//! - Pluggable transport with timeouts, retry, rate limiting and extra trust roots
//! - Async API with Tokio
//!
//! ## Example
//!
//! ```rust,no_run
//! use campus_harvest::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = PortalClient::new(ClientConfig::from_env())?;
//!
//!     let news = client
//!         .news(Locale::Italian, true, Some(10), None, None, None)
//!         .await?;
//!     for item in news {
//!         println!("{} - {}", item.title, item.url);
//!     }
//!     Ok(())
//! }
//! ```

mod error;

pub mod aggregate;
pub mod client;
pub mod config;
pub mod datetime;
pub mod document;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod pipeline;
pub mod provider;

pub use client::PortalClient;
pub use error::{Error, ResponseKind, Result};

/// Re-export of the commonly used types
pub mod prelude {
    pub use crate::client::PortalClient;
    pub use crate::config::ClientConfig;
    pub use crate::datetime::Locale;
    pub use crate::error::{Error, ResponseKind, Result};
    pub use crate::models::{Event, ExamDoable, ExamReservation, News, Tax, TaxStatus};
}
