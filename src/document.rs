//! Document parsing for the extraction pipeline
//!
//! A thin adapter over `scraper::Html` and `serde_json::Value`: selector
//! compilation, whitespace-normalised text, and relative link resolution
//! against the effective URL of the page.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

use crate::extract::ExtractError;

/// A parsed HTML page
///
/// Owned by the extraction call that created it and never mutated.
pub struct Document {
    html: Html,
    base_url: Url,
}

impl Document {
    /// Parse an HTML body fetched from `base_url`
    ///
    /// Only an empty body is rejected; html5ever recovers from anything else.
    pub fn parse(body: &str, base_url: Url) -> Result<Self, ExtractError> {
        if body.trim().is_empty() {
            return Err(ExtractError::EmptyDocument(base_url.to_string()));
        }
        Ok(Self {
            html: Html::parse_document(body),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// All elements matching `selector`, in document order
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> scraper::html::Select<'a, 'b> {
        self.html.select(selector)
    }

}

/// Resolve a possibly relative link against `base`
///
/// Blank links resolve to nothing rather than to `base` itself.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok()
}

/// Compile a CSS selector
pub fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector)
        .map_err(|e| ExtractError::Selector(format!("'{}': {}", selector, e)))
}

/// Visible text of an element with whitespace collapsed
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_ws(&element.text().collect::<String>())
}

/// Collapse runs of whitespace into a single space and trim
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a JSON body
pub fn parse_json(body: &str) -> Result<Value, ExtractError> {
    Ok(serde_json::from_str(body)?)
}
