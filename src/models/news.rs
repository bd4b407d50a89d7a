use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{FromCandidate, optional_date, optional_string, required_url};
use crate::aggregate::ItemFailure;
use crate::datetime::{DatePatterns, Locale};
use crate::extract::CandidateRecord;

/// A news article from the portal listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct News {
    pub title: String,
    pub url: Url,
    pub locale: Locale,
    pub small_image_url: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    /// Publication date, when the article page shows one
    pub date: Option<NaiveDateTime>,
}

/// The portal prints news dates as "Weekday, 12 March 2024"
fn strip_weekday(raw: &str) -> &str {
    match raw.split_once(',') {
        Some((_, rest)) => rest.trim(),
        None => raw.trim(),
    }
}

impl FromCandidate for News {
    fn from_candidate(candidate: &CandidateRecord, dates: &DatePatterns) -> Result<Self, ItemFailure> {
        let title = candidate.require("title")?.to_string();
        let url = required_url(candidate, "url")?;

        let date = match candidate.get("date") {
            Some(raw) => {
                let mut dated = candidate.clone();
                dated.set("date", Some(strip_weekday(raw).to_string()));
                optional_date(&dated, "date", dates)
            }
            None => None,
        };

        Ok(News {
            title,
            url,
            locale: dates.locale(),
            small_image_url: optional_string(candidate, "small_image"),
            image_url: optional_string(candidate, "image"),
            description: optional_string(candidate, "description"),
            date,
        })
    }
}
