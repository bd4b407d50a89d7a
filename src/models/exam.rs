use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{FromCandidate, optional_date, optional_string, required_date, required_number};
use crate::aggregate::ItemFailure;
use crate::datetime::DatePatterns;
use crate::extract::CandidateRecord;

/// An exam the student can still take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamDoable {
    pub exam_code: String,
    pub description: String,
    pub course_code: String,
    pub cfu: u32,
    pub ssd: Option<String>,
    pub module_code: Option<String>,
}

impl FromCandidate for ExamDoable {
    fn from_candidate(candidate: &CandidateRecord, _dates: &DatePatterns) -> Result<Self, ItemFailure> {
        Ok(ExamDoable {
            exam_code: candidate.require("exam_code")?.to_string(),
            description: candidate.require("description")?.to_string(),
            course_code: candidate.require("course_code")?.to_string(),
            cfu: required_number(candidate, "cfu")?,
            ssd: optional_string(candidate, "ssd"),
            module_code: optional_string(candidate, "module_code"),
        })
    }
}

/// An exam session, either booked or open for booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamReservation {
    pub report_id: i64,
    pub session_id: i64,
    pub exam_subject: String,
    pub exam_date: NaiveDateTime,
    pub course_code: Option<String>,
    pub teacher: Option<String>,
    pub channel: Option<String>,
    pub start_booking: Option<NaiveDateTime>,
    pub end_booking: Option<NaiveDateTime>,
    /// Position in the booking list, set for active reservations only
    pub reservation_number: Option<u32>,
    pub note: Option<String>,
}

impl FromCandidate for ExamReservation {
    fn from_candidate(candidate: &CandidateRecord, dates: &DatePatterns) -> Result<Self, ItemFailure> {
        let reservation_number = match candidate.get("reservation_number") {
            Some(_) => Some(required_number(candidate, "reservation_number")?),
            None => None,
        };

        Ok(ExamReservation {
            report_id: required_number(candidate, "report_id")?,
            session_id: required_number(candidate, "session_id")?,
            exam_subject: candidate.require("exam_subject")?.to_string(),
            exam_date: required_date(candidate, "exam_date", dates)?,
            course_code: optional_string(candidate, "course_code"),
            teacher: optional_string(candidate, "teacher"),
            channel: optional_string(candidate, "channel"),
            start_booking: optional_date(candidate, "start_booking", dates),
            end_booking: optional_date(candidate, "end_booking", dates),
            reservation_number,
            note: optional_string(candidate, "note"),
        })
    }
}
