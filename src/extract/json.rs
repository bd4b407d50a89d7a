//! JSON-pointer extraction over API responses

use serde_json::Value;
use url::Url;

use super::{Extraction, ExtractError, Lookup, RuleSet, build_candidate};
use crate::error::ResponseKind;

fn check_pointer(pointer: &str) -> Result<(), ExtractError> {
    if pointer.is_empty() || pointer.starts_with('/') {
        Ok(())
    } else {
        Err(ExtractError::Pointer(pointer.to_string()))
    }
}

fn lookup(item: &Value, pointer: &str) -> Lookup {
    match item.pointer(pointer) {
        None | Some(Value::Null) => Lookup::Missing,
        Some(Value::String(s)) => Lookup::from_raw(s.trim().to_string()),
        Some(Value::Number(n)) => Lookup::Value(n.to_string()),
        Some(Value::Bool(b)) => Lookup::Value(b.to_string()),
        Some(other) => Lookup::Value(other.to_string()),
    }
}

/// Apply `rules` to every element of the array found at the container pointer
///
/// A missing container, or one that is not an array, is an unexpected shape.
/// An empty array is a valid, empty answer.
pub fn extract_json(value: &Value, rules: &RuleSet, base_url: &Url) -> Result<Extraction, ExtractError> {
    check_pointer(&rules.container)?;
    for rule in &rules.fields {
        check_pointer(&rule.locator)?;
    }

    let items = match value.pointer(&rules.container) {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ExtractError::UnexpectedShape(format!(
                "'{}' is not an array",
                rules.container
            )));
        }
        None => {
            return Err(ExtractError::UnexpectedShape(format!(
                "no value at '{}'",
                rules.container
            )));
        }
    };

    let outcomes = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let lookups = rules
                .fields
                .iter()
                .map(|rule| (rule, lookup(item, &rule.locator)));
            build_candidate(index, base_url, rules, lookups, ResponseKind::Json)
        })
        .collect();

    Ok(Extraction {
        containers: items.len(),
        outcomes,
    })
}
