use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{FromCandidate, optional_string, required_date, required_url};
use crate::aggregate::ItemFailure;
use crate::datetime::DatePatterns;
use crate::extract::CandidateRecord;

/// What kind of calendar entry an event is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Public events announced in the newsletter
    Theatre,
}

/// One scheduled occurrence of an event
///
/// An event announced with several dates yields one `Event` per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub title: String,
    pub url: Url,
    pub start: NaiveDateTime,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub room: Option<String>,
    /// Building or venue
    pub place: Option<String>,
}

fn room_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r" ?- ?").expect("valid room separator regex"))
}

/// "Aula 1 - Piano terra" becomes "Aula 1, Piano terra"
fn normalize_room(raw: &str) -> String {
    room_separator().replace_all(raw.trim(), ", ").into_owned()
}

impl FromCandidate for Event {
    fn from_candidate(candidate: &CandidateRecord, dates: &DatePatterns) -> Result<Self, ItemFailure> {
        let title = candidate.require("title")?.to_string();
        let url = required_url(candidate, "url")?;
        let start = required_date(candidate, "start", dates)?;

        Ok(Event {
            kind: EventKind::Theatre,
            title,
            url,
            start,
            image_url: optional_string(candidate, "image"),
            description: optional_string(candidate, "description"),
            room: candidate.get("room").map(normalize_room),
            place: optional_string(candidate, "place"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::FailureReason;
    use crate::datetime::Locale;
    use crate::models::test_support::candidate;
    use chrono::NaiveDate;

    const BASE: &str = "https://www.uniroma1.it/it/newsletter";

    #[test]
    fn test_room_separator() {
        assert_eq!(normalize_room("Aula Magna - Rettorato"), "Aula Magna, Rettorato");
        assert_eq!(normalize_room("Aula 1-Piano terra"), "Aula 1, Piano terra");
        assert_eq!(normalize_room(" Aula 3 "), "Aula 3");
    }

    #[test]
    fn test_event_from_block() {
        let record = candidate(
            BASE,
            &[
                ("title", "Concerto di primavera"),
                ("url", "/it/evento/concerto"),
                ("start", "martedì 12 marzo 2024 alle 18:30"),
                ("room", "Aula Magna - Rettorato"),
                ("place", "Città universitaria"),
            ],
        );

        let event = Event::from_candidate(&record, &DatePatterns::for_locale(Locale::Italian)).unwrap();
        assert_eq!(event.kind, EventKind::Theatre);
        assert_eq!(event.url.as_str(), "https://www.uniroma1.it/it/evento/concerto");
        assert_eq!(
            event.start,
            NaiveDate::from_ymd_opt(2024, 3, 12).unwrap().and_hms_opt(18, 30, 0).unwrap()
        );
        assert_eq!(event.room.as_deref(), Some("Aula Magna, Rettorato"));
        assert_eq!(event.place.as_deref(), Some("Città universitaria"));
    }

    #[test]
    fn test_bad_start_is_invalid_date() {
        let record = candidate(
            BASE,
            &[("title", "Seminario"), ("url", "/it/evento/s"), ("start", "data da definire")],
        );
        let failure =
            Event::from_candidate(&record, &DatePatterns::for_locale(Locale::Italian)).unwrap_err();
        assert_eq!(failure.reason, FailureReason::InvalidDate);
    }
}
