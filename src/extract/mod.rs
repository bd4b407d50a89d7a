//! # Field Extraction
//!
//! Applies a data-driven [`RuleSet`] to every container of a parsed page and
//! turns each container into a [`CandidateRecord`] or a classified failure.
//! Provider-specific selectors live in the rule sets, never in this module.
//!
//! ## Key Components
//!
//! - `RuleSet` / `FieldRule`: container locator plus per-field locators
//! - `extract_html`: CSS selectors over a [`Document`](crate::document::Document)
//! - `extract_json`: JSON pointers over a `serde_json::Value`
//!
//! Extraction never raises for a bad item. Only rule compile errors and
//! unusable documents are returned as errors.

mod error;
mod html;
mod json;
mod rules;

pub use error::ExtractError;
pub use html::extract_html;
pub use json::extract_json;
pub use rules::{CandidateRecord, FieldRule, RuleSet, ValueSource};

use tracing::debug;
use url::Url;

use crate::aggregate::{ExtractionOutcome, FailureReason};
use crate::document::resolve_link;
use crate::error::{Error, ResponseKind};

/// Outcomes of one document
#[derive(Debug)]
pub struct Extraction {
    /// Number of containers matched, dropped ones included
    pub containers: usize,
    pub outcomes: Vec<ExtractionOutcome<CandidateRecord>>,
}

impl Extraction {
    /// No container matched at all
    pub fn is_miss(&self) -> bool {
        self.containers == 0
    }
}

/// Result of looking up one field in one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Lookup {
    Missing,
    Blank,
    Value(String),
}

impl Lookup {
    pub(crate) fn from_raw(raw: String) -> Self {
        if raw.is_empty() {
            Lookup::Blank
        } else {
            Lookup::Value(raw)
        }
    }
}

/// Assemble a candidate from the lookups of one container
///
/// Returns `None` when the title is present but blank.
pub(crate) fn build_candidate<'r>(
    index: usize,
    base_url: &Url,
    rules: &'r RuleSet,
    lookups: impl IntoIterator<Item = (&'r FieldRule, Lookup)>,
    kind: ResponseKind,
) -> Option<ExtractionOutcome<CandidateRecord>> {
    let mut candidate = CandidateRecord::new(index, base_url.clone());
    let mut failure: Option<(FailureReason, String)> = None;

    for (rule, lookup) in lookups {
        let value = match lookup {
            Lookup::Blank if rules.is_title(rule) => {
                debug!("Dropping item {} with a blank title", index);
                return None;
            }
            Lookup::Missing | Lookup::Blank => {
                if rule.required && failure.is_none() {
                    failure = Some((
                        FailureReason::MissingField,
                        format!("missing required field '{}' in item {}", rule.name, index),
                    ));
                }
                None
            }
            Lookup::Value(value) if rule.link => match resolve_link(base_url, &value) {
                Some(url) => Some(url.to_string()),
                None => {
                    if rule.required && failure.is_none() {
                        failure = Some((
                            FailureReason::InvalidUrl,
                            format!("cannot resolve '{}' for field '{}' in item {}", value, rule.name, index),
                        ));
                    }
                    None
                }
            },
            Lookup::Value(value) => Some(value),
        };
        candidate.set(&rule.name, value);
    }

    Some(match failure {
        Some((reason, message)) => {
            ExtractionOutcome::failed(reason, Error::invalid_response(kind, message))
        }
        None => ExtractionOutcome::Record(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://portal.test/en/all-news").unwrap()
    }

    fn rules() -> RuleSet {
        RuleSet::new("item")
            .field(FieldRule::text("title", "h2").required())
            .field(FieldRule::attr("url", "a", "href").required().link())
            .field(FieldRule::text("summary", "p"))
            .title("title")
    }

    #[test]
    fn test_build_candidate_resolves_links() {
        let rules = rules();
        let outcome = build_candidate(
            3,
            &base(),
            &rules,
            vec![
                (&rules.fields[0], Lookup::Value("Open day".into())),
                (&rules.fields[1], Lookup::Value("/en/news/open-day".into())),
                (&rules.fields[2], Lookup::Missing),
            ],
            ResponseKind::Html,
        )
        .unwrap();

        match outcome {
            ExtractionOutcome::Record(candidate) => {
                assert_eq!(candidate.index, 3);
                assert_eq!(candidate.get("url"), Some("https://portal.test/en/news/open-day"));
                assert_eq!(candidate.get("summary"), None);
            }
            other => panic!("expected a record, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_title_drops_even_with_other_failures() {
        let rules = rules();
        let outcome = build_candidate(
            0,
            &base(),
            &rules,
            vec![
                (&rules.fields[0], Lookup::Blank),
                (&rules.fields[1], Lookup::Missing),
            ],
            ResponseKind::Html,
        );
        assert!(outcome.is_none());
    }

    #[test]
    fn test_unresolvable_required_link_fails() {
        let rules = rules();
        let outcome = build_candidate(
            2,
            &base(),
            &rules,
            vec![
                (&rules.fields[0], Lookup::Value("Title".into())),
                (&rules.fields[1], Lookup::Value("http://[broken".into())),
            ],
            ResponseKind::Html,
        )
        .unwrap();

        assert_eq!(outcome.failure().unwrap().reason, FailureReason::InvalidUrl);
    }

    #[test]
    fn test_missing_required_field_fails() {
        let rules = rules();
        let outcome = build_candidate(
            1,
            &base(),
            &rules,
            vec![
                (&rules.fields[0], Lookup::Value("Title".into())),
                (&rules.fields[1], Lookup::Blank),
            ],
            ResponseKind::Html,
        )
        .unwrap();

        let failure = outcome.failure().unwrap();
        assert_eq!(failure.reason, FailureReason::MissingField);
        assert!(failure.cause.as_ref().unwrap().to_string().contains("'url'"));
    }
}
