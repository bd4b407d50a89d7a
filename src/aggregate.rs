//! # Failure Aggregation
//!
//! Folds the per-item outcomes of one extraction run into a single verdict.
//!
//! ## Decision rule
//!
//! - nothing processed: success with no records
//! - at least one record: success, failures are dropped and logged
//! - items processed but no record: hard failure, classified by the
//!   dominant reason when every failure shares one

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, ResponseKind, Result};

/// Why an item did not become a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    /// A required field had no match or an empty value
    MissingField,
    /// A field was present but could not be converted
    InvalidField,
    /// A link could not be resolved to an absolute URL
    InvalidUrl,
    /// A required date matched none of the patterns
    InvalidDate,
    /// The detail page of the item could not be fetched or parsed
    DetailFetchFailed,
    /// The detail page carried no usable date and place block
    NoSchedule,
    /// A listing page had no containers at all
    EmptyListing,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::MissingField => "missing-field",
            FailureReason::InvalidField => "invalid-field",
            FailureReason::InvalidUrl => "invalid-url",
            FailureReason::InvalidDate => "invalid-date",
            FailureReason::DetailFetchFailed => "detail-fetch-failed",
            FailureReason::NoSchedule => "no-schedule",
            FailureReason::EmptyListing => "empty-listing",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified per-item failure
#[derive(Debug)]
pub struct ItemFailure {
    pub reason: FailureReason,
    pub cause: Option<Error>,
}

impl ItemFailure {
    pub fn new(reason: FailureReason) -> Self {
        Self {
            reason,
            cause: None,
        }
    }

    pub fn with_cause(reason: FailureReason, cause: impl Into<Error>) -> Self {
        Self {
            reason,
            cause: Some(cause.into()),
        }
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{} ({})", self.reason, cause),
            None => write!(f, "{}", self.reason),
        }
    }
}

/// Result of processing one item
///
/// `Skipped` marks an item whose detail step gave up, `Failed` one whose own
/// content was unusable. Both count as failures for the verdict.
#[derive(Debug)]
pub enum ExtractionOutcome<T> {
    Record(T),
    Skipped(ItemFailure),
    Failed(ItemFailure),
}

impl<T> ExtractionOutcome<T> {
    pub fn failed(reason: FailureReason, cause: impl Into<Error>) -> Self {
        ExtractionOutcome::Failed(ItemFailure::with_cause(reason, cause))
    }

    pub fn skipped(reason: FailureReason, cause: impl Into<Error>) -> Self {
        ExtractionOutcome::Skipped(ItemFailure::with_cause(reason, cause))
    }

    pub fn is_record(&self) -> bool {
        matches!(self, ExtractionOutcome::Record(_))
    }

    /// The failure carried by this outcome, if any
    pub fn failure(&self) -> Option<&ItemFailure> {
        match self {
            ExtractionOutcome::Record(_) => None,
            ExtractionOutcome::Skipped(f) | ExtractionOutcome::Failed(f) => Some(f),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractionOutcome<U> {
        match self {
            ExtractionOutcome::Record(value) => ExtractionOutcome::Record(f(value)),
            ExtractionOutcome::Skipped(failure) => ExtractionOutcome::Skipped(failure),
            ExtractionOutcome::Failed(failure) => ExtractionOutcome::Failed(failure),
        }
    }

    /// Chain a fallible conversion, keeping earlier failures as they are
    pub fn and_then<U>(self, f: impl FnOnce(T) -> ExtractionOutcome<U>) -> ExtractionOutcome<U> {
        match self {
            ExtractionOutcome::Record(value) => f(value),
            ExtractionOutcome::Skipped(failure) => ExtractionOutcome::Skipped(failure),
            ExtractionOutcome::Failed(failure) => ExtractionOutcome::Failed(failure),
        }
    }
}

/// Summary of one extraction run
#[derive(Debug)]
pub struct AggregateResult<T> {
    /// Records in source order
    pub records: Vec<T>,

    /// Failure count per reason
    pub histogram: BTreeMap<FailureReason, usize>,

    /// Set only when every failure shares the same reason
    pub dominant_reason: Option<FailureReason>,

    /// Cause of the first failure observed
    pub representative_cause: Option<Error>,

    /// Number of items that reached a terminal outcome
    pub processed: usize,
}

impl<T> AggregateResult<T> {
    /// Fold a sequence of outcomes, one per item
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = ExtractionOutcome<T>>,
    {
        outcomes
            .into_iter()
            .fold(FailureAggregator::new(), |mut aggregator, outcome| {
                aggregator.push(outcome);
                aggregator
            })
            .finalize()
    }

    pub fn failures(&self) -> usize {
        self.histogram.values().sum()
    }

    /// True when items were processed and none produced a record
    pub fn is_total_failure(&self) -> bool {
        self.records.is_empty() && self.processed > 0
    }

    /// Apply the decision rule
    ///
    /// `kind` classifies the error raised on total failure (`Html` for
    /// scraped listings, `Json` for API listings).
    pub fn into_records(self, kind: ResponseKind) -> Result<Vec<T>> {
        if self.is_total_failure() {
            let error = match self.dominant_reason {
                Some(reason) => {
                    let error = Error::invalid_response(
                        kind,
                        format!("{}: reason: {}", kind.label(), reason),
                    );
                    match self.representative_cause {
                        Some(cause) => error.with_cause(cause),
                        None => error,
                    }
                }
                None => Error::invalid_response(kind, format!("{}: multiple reasons", kind.label())),
            };
            warn!(
                "All {} processed items failed: {:?}",
                self.processed, self.histogram
            );
            return Err(error);
        }

        if !self.histogram.is_empty() {
            warn!(
                "Dropped {} of {} items: {:?}",
                self.failures(),
                self.processed,
                self.histogram
            );
        }
        Ok(self.records)
    }
}

/// Incremental form of [`AggregateResult::from_outcomes`]
#[derive(Debug)]
pub struct FailureAggregator<T> {
    records: Vec<T>,
    histogram: BTreeMap<FailureReason, usize>,
    first_cause: Option<Error>,
    processed: usize,
}

impl<T> Default for FailureAggregator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FailureAggregator<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            histogram: BTreeMap::new(),
            first_cause: None,
            processed: 0,
        }
    }

    /// Observe the single outcome of one item
    pub fn push(&mut self, outcome: ExtractionOutcome<T>) {
        self.processed += 1;
        self.observe(outcome);
    }

    /// Observe every outcome of one item that fanned out into several
    ///
    /// An empty sequence still counts the item as processed.
    pub fn push_all<I>(&mut self, outcomes: I)
    where
        I: IntoIterator<Item = ExtractionOutcome<T>>,
    {
        self.processed += 1;
        for outcome in outcomes {
            self.observe(outcome);
        }
    }

    fn observe(&mut self, outcome: ExtractionOutcome<T>) {
        match outcome {
            ExtractionOutcome::Record(record) => self.records.push(record),
            ExtractionOutcome::Skipped(failure) | ExtractionOutcome::Failed(failure) => {
                debug!("Item dropped: {}", failure);
                *self.histogram.entry(failure.reason).or_insert(0) += 1;
                if self.first_cause.is_none() {
                    self.first_cause = failure.cause;
                }
            }
        }
    }

    /// Records collected so far
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn finalize(self) -> AggregateResult<T> {
        let dominant_reason = if self.histogram.len() == 1 {
            self.histogram.keys().next().copied()
        } else {
            None
        };

        AggregateResult {
            records: self.records,
            histogram: self.histogram,
            dominant_reason,
            representative_cause: self.first_cause,
            processed: self.processed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn cause(message: &str) -> Error {
        Error::Other(message.to_string())
    }

    #[test]
    fn test_reason_names() {
        assert_eq!(FailureReason::DetailFetchFailed.to_string(), "detail-fetch-failed");
        assert_eq!(
            serde_json::to_string(&FailureReason::NoSchedule).unwrap(),
            "\"no-schedule\""
        );
    }

    #[test]
    fn test_nothing_processed_is_empty_success() {
        let result = AggregateResult::<u32>::from_outcomes(Vec::new());
        assert_eq!(result.processed, 0);
        assert!(!result.is_total_failure());
        assert!(result.into_records(ResponseKind::Html).unwrap().is_empty());
    }

    #[test]
    fn test_partial_failure_is_silent_success() {
        let outcomes = vec![
            ExtractionOutcome::Record(1),
            ExtractionOutcome::skipped(FailureReason::DetailFetchFailed, cause("404")),
            ExtractionOutcome::Record(2),
            ExtractionOutcome::skipped(FailureReason::DetailFetchFailed, cause("timeout")),
            ExtractionOutcome::Record(3),
        ];
        let result = AggregateResult::from_outcomes(outcomes);

        assert_eq!(result.processed, 5);
        assert_eq!(result.failures(), 2);
        assert_eq!(result.histogram.get(&FailureReason::DetailFetchFailed), Some(&2));
        assert_eq!(result.dominant_reason, Some(FailureReason::DetailFetchFailed));
        assert_eq!(result.into_records(ResponseKind::Html).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_single_reason_total_failure_names_reason() {
        let outcomes: Vec<ExtractionOutcome<u32>> = vec![
            ExtractionOutcome::failed(FailureReason::MissingField, cause("no title in item 0")),
            ExtractionOutcome::failed(FailureReason::MissingField, cause("no title in item 1")),
            ExtractionOutcome::failed(FailureReason::MissingField, cause("no title in item 2")),
        ];
        let err = AggregateResult::from_outcomes(outcomes)
            .into_records(ResponseKind::Html)
            .unwrap_err();

        assert!(err.is_html_error());
        assert!(err.to_string().ends_with("invalid HTML: reason: missing-field"));
        assert_eq!(err.source().unwrap().to_string(), "no title in item 0");
    }

    #[test]
    fn test_mixed_reasons_total_failure() {
        let outcomes: Vec<ExtractionOutcome<u32>> = vec![
            ExtractionOutcome::failed(FailureReason::MissingField, cause("a")),
            ExtractionOutcome::failed(FailureReason::MissingField, cause("b")),
            ExtractionOutcome::failed(FailureReason::InvalidDate, cause("c")),
        ];
        let result = AggregateResult::from_outcomes(outcomes);
        assert!(result.dominant_reason.is_none());
        assert_eq!(result.histogram.len(), 2);

        let err = result.into_records(ResponseKind::Html).unwrap_err();
        assert!(err.to_string().ends_with("invalid HTML: multiple reasons"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_json_kind_label() {
        let outcomes: Vec<ExtractionOutcome<u32>> =
            vec![ExtractionOutcome::failed(FailureReason::InvalidField, cause("amount"))];
        let err = AggregateResult::from_outcomes(outcomes)
            .into_records(ResponseKind::Json)
            .unwrap_err();
        assert!(err.is_json_error());
        assert!(err.to_string().ends_with("invalid JSON: reason: invalid-field"));
    }

    #[test]
    fn test_histogram_empty_without_failures() {
        let result = AggregateResult::from_outcomes(vec![
            ExtractionOutcome::Record("a"),
            ExtractionOutcome::Record("b"),
        ]);
        assert!(result.histogram.is_empty());
        assert!(result.dominant_reason.is_none());
        assert!(result.representative_cause.is_none());
    }

    #[test]
    fn test_fan_out_counts_one_item() {
        let mut aggregator = FailureAggregator::new();
        aggregator.push_all(vec![
            ExtractionOutcome::Record("lecture, room A"),
            ExtractionOutcome::Record("lecture, room B"),
        ]);
        aggregator.push_all(Vec::new());
        aggregator.push(ExtractionOutcome::skipped(FailureReason::NoSchedule, cause("no blocks")));

        assert_eq!(aggregator.record_count(), 2);
        assert_eq!(aggregator.processed(), 3);

        let result = aggregator.finalize();
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.dominant_reason, Some(FailureReason::NoSchedule));
    }

    #[test]
    fn test_outcome_combinators() {
        let outcome = ExtractionOutcome::Record(2).map(|n| n * 10);
        assert!(matches!(outcome, ExtractionOutcome::Record(20)));

        let chained: ExtractionOutcome<u32> = ExtractionOutcome::Record(1)
            .and_then(|_| ExtractionOutcome::failed(FailureReason::InvalidUrl, cause("x")));
        assert_eq!(chained.failure().unwrap().reason, FailureReason::InvalidUrl);
        assert!(!chained.is_record());
    }
}
