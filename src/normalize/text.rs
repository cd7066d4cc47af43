// src/normalize/text.rs

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref DIGIT_COMMA: Regex = Regex::new(r"(\d),(\d)").unwrap();
}

/// Trims and collapses every run of whitespace (including newlines and
/// non-breaking spaces) to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Lowercases, removes thousands separators and maps the dash variants
/// sources use for ranges onto a plain `-`.
pub fn fold_for_matching(text: &str) -> String {
    let mut folded = text.to_lowercase().replace(['–', '—', '−'], "-");

    // "1,2,3" needs a second pass because matches cannot overlap.
    while DIGIT_COMMA.is_match(&folded) {
        folded = DIGIT_COMMA.replace_all(&folded, "$1$2").into_owned();
    }
    folded
}

/// Parses a matched number. Non-finite results count as no match.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Removes duplicates, keeping the first occurrence of each value.
pub fn dedup_preserving_order<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| !v.is_empty() && seen.insert(v.clone()))
        .collect()
}
