//! Rule sets and candidate records

use std::collections::BTreeMap;

use url::Url;

use crate::aggregate::{FailureReason, ItemFailure};
use crate::error::{Error, ResponseKind};

/// Where the value of a field comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// All descendant text, whitespace collapsed
    Text,
    /// Text nodes directly under the element only
    OwnText,
    /// Value of an attribute, trimmed
    Attr(String),
}

/// Locates one field relative to a container
///
/// For HTML rules the locator is a CSS selector and the first match wins; for
/// JSON rules it is a JSON pointer. An empty locator means the container
/// itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: String,
    pub locator: String,
    pub source: ValueSource,
    pub required: bool,
    /// Resolve the value against the page URL
    pub link: bool,
}

impl FieldRule {
    fn new(name: &str, locator: &str, source: ValueSource) -> Self {
        Self {
            name: name.to_string(),
            locator: locator.to_string(),
            source,
            required: false,
            link: false,
        }
    }

    pub fn text(name: &str, locator: &str) -> Self {
        Self::new(name, locator, ValueSource::Text)
    }

    pub fn own_text(name: &str, locator: &str) -> Self {
        Self::new(name, locator, ValueSource::OwnText)
    }

    pub fn attr(name: &str, locator: &str, attribute: &str) -> Self {
        Self::new(name, locator, ValueSource::Attr(attribute.to_string()))
    }

    /// JSON rules take the value at the pointer whatever its type
    pub fn pointer(name: &str, pointer: &str) -> Self {
        Self::new(name, pointer, ValueSource::Text)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn link(mut self) -> Self {
        self.link = true;
        self
    }
}

/// Extraction rules for one kind of page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    /// Container selector, or JSON pointer to an array of containers
    pub container: String,
    pub fields: Vec<FieldRule>,
    /// A container whose title is present but blank is dropped without a trace
    pub title_field: Option<String>,
}

impl RuleSet {
    pub fn new(container: &str) -> Self {
        Self {
            container: container.to_string(),
            fields: Vec::new(),
            title_field: None,
        }
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    pub fn title(mut self, name: &str) -> Self {
        self.title_field = Some(name.to_string());
        self
    }

    pub(crate) fn is_title(&self, rule: &FieldRule) -> bool {
        self.title_field.as_deref() == Some(rule.name.as_str())
    }
}

/// Field values extracted from one container
///
/// `None` marks a field that was looked up and not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    /// Position of the container in its document
    pub index: usize,
    pub base_url: Url,
    pub fields: BTreeMap<String, Option<String>>,
}

impl CandidateRecord {
    pub fn new(index: usize, base_url: Url) -> Self {
        Self {
            index,
            base_url,
            fields: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, name: &str, value: Option<String>) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_deref())
    }

    /// A field that must be present and non-empty
    pub fn require(&self, name: &str) -> Result<&str, ItemFailure> {
        self.get(name).filter(|v| !v.is_empty()).ok_or_else(|| {
            ItemFailure::with_cause(
                FailureReason::MissingField,
                Error::invalid_response(
                    ResponseKind::Html,
                    format!("missing required field '{}' in item {}", name, self.index),
                ),
            )
        })
    }

    /// A field holding an absolute URL
    pub fn url(&self, name: &str) -> Option<Url> {
        self.get(name).and_then(|v| Url::parse(v).ok())
    }

    /// Merge values from a detail page; present values win
    pub fn merge(&mut self, detail: CandidateRecord) {
        for (name, value) in detail.fields {
            match value {
                Some(value) => {
                    self.fields.insert(name, Some(value));
                }
                None => {
                    self.fields.entry(name).or_insert(None);
                }
            }
        }
    }
}
