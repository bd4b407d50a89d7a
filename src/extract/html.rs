//! CSS-selector extraction over HTML documents

use scraper::{ElementRef, Selector};
use tracing::debug;

use super::{Extraction, ExtractError, FieldRule, Lookup, RuleSet, ValueSource, build_candidate};
use crate::document::{Document, element_text, normalize_ws, parse_selector};
use crate::error::ResponseKind;

struct CompiledField<'r> {
    rule: &'r FieldRule,
    selector: Option<Selector>,
}

fn compile(rules: &RuleSet) -> Result<(Selector, Vec<CompiledField<'_>>), ExtractError> {
    let container = parse_selector(&rules.container)?;
    let fields = rules
        .fields
        .iter()
        .map(|rule| {
            let selector = if rule.locator.is_empty() {
                None
            } else {
                Some(parse_selector(&rule.locator)?)
            };
            Ok(CompiledField { rule, selector })
        })
        .collect::<Result<Vec<_>, ExtractError>>()?;
    Ok((container, fields))
}

fn own_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for child in element.children() {
        if let Some(node) = child.value().as_text() {
            text.push_str(node);
            text.push(' ');
        }
    }
    normalize_ws(&text)
}

fn lookup(container: ElementRef<'_>, field: &CompiledField<'_>) -> Lookup {
    let target = match &field.selector {
        Some(selector) => match container.select(selector).next() {
            Some(element) => element,
            None => return Lookup::Missing,
        },
        None => container,
    };

    match &field.rule.source {
        ValueSource::Text => Lookup::from_raw(element_text(target)),
        ValueSource::OwnText => Lookup::from_raw(own_text(target)),
        ValueSource::Attr(name) => match target.value().attr(name) {
            Some(value) => Lookup::from_raw(value.trim().to_string()),
            None => Lookup::Missing,
        },
    }
}

/// Apply `rules` to every container of `document`
///
/// Outcomes follow document order. Containers with a blank title are counted
/// in `containers` but produce no outcome.
pub fn extract_html(document: &Document, rules: &RuleSet) -> Result<Extraction, ExtractError> {
    let (container, fields) = compile(rules)?;

    let mut containers = 0;
    let mut outcomes = Vec::new();
    for (index, element) in document.select(&container).enumerate() {
        containers += 1;
        let lookups = fields.iter().map(|field| (field.rule, lookup(element, field)));
        if let Some(outcome) =
            build_candidate(index, document.base_url(), rules, lookups, ResponseKind::Html)
        {
            outcomes.push(outcome);
        }
    }

    debug!(
        "Matched {} containers for '{}' on {}, {} outcomes",
        containers,
        rules.container,
        document.base_url(),
        outcomes.len()
    );
    Ok(Extraction {
        containers,
        outcomes,
    })
}
