//! # Pagination and Iteration
//!
//! Walks a listing page by page, extracts candidates, enriches each one from
//! its detail page and hands every outcome to the failure aggregator.
//!
//! ## Key Components
//!
//! - `PageBounds`: which pages to visit and how many records to keep
//! - `Listing`: endpoint, paging parameter and container rules
//! - `DetailSpec`: rules for the per-item detail page, with optional fan-out
//!   into repeated blocks
//! - `ListingDriver`: the sequential fetch/extract/aggregate loop
//!
//! ## Features
//!
//! - The limit counts records, so fetching stops as soon as it is reached
//! - A run in which every page lacks containers fails as `empty-listing`
//! - Detail failures drop only the affected item

mod bounds;
mod driver;

pub use bounds::PageBounds;
pub use driver::{DetailSpec, Listing, ListingDriver};
