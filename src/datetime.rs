//! # Date/Time Normalization
//!
//! Turns the free-text dates of portal pages into `NaiveDateTime` values by
//! trying an ordered list of `chrono` patterns. The first pattern that
//! consumes the whole input wins.
//!
//! Italian month and weekday names are translated to English before parsing,
//! so patterns are always written with `%B` / `%A`. Matching ignores case:
//! the input and the literal text of every pattern (`alle`, `at`, `T`) are
//! lowercased, the `%` specifiers are kept as written.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Error as CrateError, ResponseKind};

/// Error type for date normalization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("empty date")]
    Empty,

    /// None of the patterns consumed the input
    #[error("no pattern matched '{input}' (tried {tried})")]
    NoMatch { input: String, tried: usize },
}

impl From<DateParseError> for CrateError {
    fn from(err: DateParseError) -> Self {
        CrateError::invalid_response(ResponseKind::Generic, err.to_string())
    }
}

/// Language of a portal page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Locale {
    #[default]
    Italian,
    English,
}

impl Locale {
    /// Parse a language tag such as `it` or `en-GB`
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "it" => Some(Locale::Italian),
            "en" => Some(Locale::English),
            _ => None,
        }
    }

    /// Path segment used by the portal
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::Italian => "it",
            Locale::English => "en",
        }
    }
}

const ITALIAN_NAMES: &[(&str, &str)] = &[
    ("gennaio", "january"),
    ("febbraio", "february"),
    ("marzo", "march"),
    ("aprile", "april"),
    ("maggio", "may"),
    ("giugno", "june"),
    ("luglio", "july"),
    ("agosto", "august"),
    ("settembre", "september"),
    ("ottobre", "october"),
    ("novembre", "november"),
    ("dicembre", "december"),
    ("gen", "jan"),
    ("mag", "may"),
    ("giu", "jun"),
    ("lug", "jul"),
    ("ago", "aug"),
    ("set", "sep"),
    ("ott", "oct"),
    ("dic", "dec"),
    // "mar" is read as the month, which is spelled the same in English
    ("lunedì", "monday"),
    ("lunedi", "monday"),
    ("martedì", "tuesday"),
    ("martedi", "tuesday"),
    ("mercoledì", "wednesday"),
    ("mercoledi", "wednesday"),
    ("giovedì", "thursday"),
    ("giovedi", "thursday"),
    ("venerdì", "friday"),
    ("venerdi", "friday"),
    ("sabato", "saturday"),
    ("domenica", "sunday"),
    ("lun", "mon"),
    ("mer", "wed"),
    ("gio", "thu"),
    ("ven", "fri"),
    ("sab", "sat"),
    ("dom", "sun"),
];

/// Lowercase, collapse whitespace and translate locale names to English
fn prepare(text: &str, locale: Locale) -> String {
    text.split_whitespace()
        .map(|word| {
            let word = word.to_lowercase();
            if locale != Locale::Italian {
                return word;
            }
            let bare = word.trim_end_matches([',', '.']);
            let suffix = &word[bare.len()..];
            match ITALIAN_NAMES.iter().find(|(it, _)| *it == bare) {
                Some((_, en)) => format!("{}{}", en, suffix),
                None => word.clone(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase the literal text of a format, leaving `%` specifiers untouched
fn fold_literals(format: &str) -> String {
    let mut folded = String::with_capacity(format.len());
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            folded.extend(c.to_lowercase());
            continue;
        }
        folded.push(c);
        // flags and widths run until the specifier letter
        for spec in chars.by_ref() {
            folded.push(spec);
            if spec.is_ascii_alphabetic() || spec == '%' {
                break;
            }
        }
    }
    folded
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DatePattern {
    format: String,
    has_time: bool,
}

impl DatePattern {
    fn new(format: &str) -> Self {
        Self {
            format: fold_literals(format),
            has_time: format.contains("%H") || format.contains("%R"),
        }
    }

    fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        if self.has_time {
            NaiveDateTime::parse_from_str(text, &self.format).ok()
        } else {
            NaiveDate::parse_from_str(text, &self.format)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        }
    }
}

/// An ordered list of date patterns for one locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePatterns {
    locale: Locale,
    patterns: Vec<DatePattern>,
}

impl DatePatterns {
    pub fn new<I, S>(locale: Locale, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            locale,
            patterns: patterns
                .into_iter()
                .map(|p| DatePattern::new(p.as_ref()))
                .collect(),
        }
    }

    /// The patterns used for portal pages in `locale`
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Italian => Self::new(
                locale,
                [
                    "%A %d %B %Y alle %H:%M",
                    "%d %B %Y alle %H:%M",
                    "%d %B %Y %H:%M",
                    "%d %B %Y",
                ],
            ),
            Locale::English => Self::new(
                locale,
                [
                    "%d %B %Y at %H:%M",
                    "%A %d %B %Y %H:%M",
                    "%d %B %Y %H:%M",
                    "%d %B %Y",
                    "%B %d, %Y",
                ],
            ),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Parse `text`, returning the value and the index of the matching pattern
    pub fn parse(&self, text: &str) -> Result<(NaiveDateTime, usize), DateParseError> {
        let prepared = prepare(text, self.locale);
        if prepared.is_empty() {
            return Err(DateParseError::Empty);
        }

        self.patterns
            .iter()
            .enumerate()
            .find_map(|(index, pattern)| pattern.parse(&prepared).map(|value| (value, index)))
            .ok_or_else(|| DateParseError::NoMatch {
                input: text.trim().to_string(),
                tried: self.patterns.len(),
            })
    }
}

/// Parse `text` with the default patterns of `locale`
pub fn normalize(text: &str, locale: Locale) -> Result<NaiveDateTime, DateParseError> {
    DatePatterns::for_locale(locale)
        .parse(text)
        .map(|(value, _)| value)
}
