//! # Domain Models
//!
//! Typed records produced by the extraction pipeline. A record is only ever
//! built from a [`CandidateRecord`] through [`FromCandidate`], which refuses
//! candidates lacking a required field, so every record in a result has all
//! of its required fields set.

mod event;
mod exam;
mod news;
mod tax;

pub use event::{Event, EventKind};
pub use exam::{ExamDoable, ExamReservation};
pub use news::News;
pub use tax::{Tax, TaxStatus};

use chrono::NaiveDateTime;
use tracing::debug;
use url::Url;

use crate::aggregate::{ExtractionOutcome, FailureReason, ItemFailure};
use crate::datetime::DatePatterns;
use crate::document::resolve_link;
use crate::error::{Error, ResponseKind};
use crate::extract::CandidateRecord;

/// Conversion from an extracted candidate into a domain record
pub trait FromCandidate: Sized {
    /// Build the record, or classify why it cannot be built
    fn from_candidate(candidate: &CandidateRecord, dates: &DatePatterns) -> Result<Self, ItemFailure>;

    /// Outcome form of [`FromCandidate::from_candidate`]
    fn outcome(candidate: &CandidateRecord, dates: &DatePatterns) -> ExtractionOutcome<Self> {
        match Self::from_candidate(candidate, dates) {
            Ok(record) => ExtractionOutcome::Record(record),
            Err(failure) => ExtractionOutcome::Failed(failure),
        }
    }
}

fn field_error(reason: FailureReason, message: String) -> ItemFailure {
    ItemFailure::with_cause(reason, Error::invalid_response(ResponseKind::Generic, message))
}

/// A required absolute URL
pub(crate) fn required_url(candidate: &CandidateRecord, name: &str) -> Result<Url, ItemFailure> {
    let raw = candidate.require(name)?;
    resolve_link(&candidate.base_url, raw).ok_or_else(|| {
        field_error(
            FailureReason::InvalidUrl,
            format!("field '{}' of item {} is not a URL: '{}'", name, candidate.index, raw),
        )
    })
}

/// A required date
pub(crate) fn required_date(
    candidate: &CandidateRecord,
    name: &str,
    dates: &DatePatterns,
) -> Result<NaiveDateTime, ItemFailure> {
    let raw = candidate.require(name)?;
    dates
        .parse(raw)
        .map(|(value, _)| value)
        .map_err(|e| ItemFailure::with_cause(FailureReason::InvalidDate, e))
}

/// An optional date; unparseable values are treated as absent
pub(crate) fn optional_date(
    candidate: &CandidateRecord,
    name: &str,
    dates: &DatePatterns,
) -> Option<NaiveDateTime> {
    let raw = candidate.get(name)?;
    match dates.parse(raw) {
        Ok((value, _)) => Some(value),
        Err(e) => {
            debug!("Ignoring field '{}' of item {}: {}", name, candidate.index, e);
            None
        }
    }
}

/// Parse a number written with either decimal separator
///
/// `"1.234,56"` and `"1234.56"` both yield `1234.56`.
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('€')
        .trim_end_matches('€')
        .trim()
        .to_string();
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(crate) fn required_amount(candidate: &CandidateRecord, name: &str) -> Result<f64, ItemFailure> {
    let raw = candidate.require(name)?;
    parse_amount(raw).ok_or_else(|| {
        field_error(
            FailureReason::InvalidField,
            format!("field '{}' of item {} is not an amount: '{}'", name, candidate.index, raw),
        )
    })
}

pub(crate) fn required_number<T: std::str::FromStr>(
    candidate: &CandidateRecord,
    name: &str,
) -> Result<T, ItemFailure> {
    let raw = candidate.require(name)?;
    raw.parse::<T>().map_err(|_| {
        field_error(
            FailureReason::InvalidField,
            format!("field '{}' of item {} is not a number: '{}'", name, candidate.index, raw),
        )
    })
}

pub(crate) fn optional_string(candidate: &CandidateRecord, name: &str) -> Option<String> {
    candidate.get(name).map(str::to_string)
}
