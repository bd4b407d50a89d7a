use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{FromCandidate, optional_date, optional_string, required_amount, required_date};
use crate::aggregate::ItemFailure;
use crate::datetime::DatePatterns;
use crate::extract::CandidateRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxStatus {
    Paid,
    Unpaid,
}

/// A tuition payment slip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    pub code: String,
    pub amount: f64,
    pub status: TaxStatus,
    pub description: Option<String>,
    pub course_code: Option<String>,
    pub academic_year: Option<String>,
    pub payment_date: Option<NaiveDateTime>,
    pub expiration_date: Option<NaiveDateTime>,
}

impl FromCandidate for Tax {
    fn from_candidate(candidate: &CandidateRecord, dates: &DatePatterns) -> Result<Self, ItemFailure> {
        // A slip that shows a payment date is paid, and the date must parse
        let (status, payment_date) = match candidate.get("payment_date") {
            Some(_) => (
                TaxStatus::Paid,
                Some(required_date(candidate, "payment_date", dates)?),
            ),
            None => (TaxStatus::Unpaid, None),
        };

        Ok(Tax {
            code: candidate.require("code")?.to_string(),
            amount: required_amount(candidate, "amount")?,
            status,
            description: optional_string(candidate, "description"),
            course_code: optional_string(candidate, "course_code"),
            academic_year: optional_string(candidate, "academic_year"),
            payment_date,
            expiration_date: optional_date(candidate, "expiration_date", dates),
        })
    }
}
