//! Submit-body validation and normalisation.
//!
//! Turns a loosely-typed [`ShortlistRequest`] into a [`ShortlistInput`] or a
//! user-facing validation message. Rules are checked in a fixed order so the
//! first problem the user would notice is the one reported.

use std::collections::BTreeMap;

use serde_json::Value;

use shortlist_types::error::ShortlistError;
use shortlist_types::shortlist::{
    DEFAULT_WEIGHT, MAX_REQUIREMENTS, MAX_WEIGHT, MIN_NEED_CHARS, MIN_WEIGHT, ShortlistInput,
    ShortlistRequest,
};

fn invalid(message: impl Into<String>) -> ShortlistError {
    ShortlistError::Validation(message.into())
}

/// Validate a submit body.
///
/// - `need` must be a string of at least 5 UTF-16 code units after trimming.
/// - `requirements` must be a non-empty array of at most 10 entries, of which
///   at least one is a non-empty string. Other entries are dropped, and
///   duplicates keep their first occurrence.
/// - every kept requirement gets a weight: the given integer in 1..=10, or 5.
/// - `excludedVendors` keeps only non-empty strings; anything else is ignored.
pub fn validate_request(raw: &ShortlistRequest) -> Result<ShortlistInput, ShortlistError> {
    let need = raw
        .need
        .as_ref()
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|need| need_length(need) >= MIN_NEED_CHARS)
        .ok_or_else(|| {
            invalid(format!(
                "Please describe your need in at least {MIN_NEED_CHARS} characters."
            ))
        })?;

    let items = match raw.requirements.as_ref() {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(invalid("Please add at least 1 requirement.")),
    };

    if items.len() > MAX_REQUIREMENTS {
        return Err(invalid(format!(
            "Maximum {MAX_REQUIREMENTS} requirements allowed."
        )));
    }

    let raw_weights = raw.weights.as_ref().and_then(Value::as_object);

    let mut requirements: Vec<String> = Vec::with_capacity(items.len());
    let mut weights = BTreeMap::new();
    for item in items {
        let Some(original) = item.as_str() else {
            continue;
        };
        let requirement = original.trim();
        if requirement.is_empty() || requirements.iter().any(|r| r == requirement) {
            continue;
        }

        // Clients may key weights by the untrimmed text.
        let weight = raw_weights
            .and_then(|w| w.get(requirement).or_else(|| w.get(original)))
            .and_then(parse_weight)
            .unwrap_or(DEFAULT_WEIGHT);

        requirements.push(requirement.to_string());
        weights.insert(requirement.to_string(), weight);
    }

    if requirements.is_empty() {
        return Err(invalid("Requirements cannot be empty strings."));
    }

    let excluded_vendors = match raw.excluded_vendors.as_ref() {
        Some(Value::Array(vendors)) => vendors
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    Ok(ShortlistInput {
        need: need.to_string(),
        requirements,
        weights,
        excluded_vendors,
    })
}

/// Length in UTF-16 code units, the unit browser-side form checks count in.
fn need_length(need: &str) -> usize {
    need.encode_utf16().count()
}

/// An integral JSON number in 1..=10; anything else is rejected.
fn parse_weight(value: &Value) -> Option<u8> {
    let n = value.as_f64()?;
    if n.fract() != 0.0 || n < f64::from(MIN_WEIGHT) || n > f64::from(MAX_WEIGHT) {
        return None;
    }
    Some(n as u8)
}
