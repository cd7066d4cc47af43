// src/normalize/size.rs

use super::text::{fold_for_matching, parse_number, round3};
use lazy_static::lazy_static;
use regex::Regex;

pub const SQFT_PER_SQM: f64 = 10.7639;
pub const ACRES_PER_HECTARE: f64 = 2.47105;
pub const SQFT_PER_ACRE: f64 = 43_560.0;

/// Floor area in square feet and land area in acres. Either, both or
/// neither may be present; one is never inferred from the other here.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeMeasurement {
    pub sqft: Option<f64>,
    pub acres: Option<f64>,
}

impl SizeMeasurement {
    pub fn is_empty(&self) -> bool {
        self.sqft.is_none() && self.acres.is_none()
    }
}

// A single value or an "A to B" / "A-B" range; group 2 is the number
// next to the unit when present.
macro_rules! measure {
    ($unit:expr) => {
        Regex::new(&format!(
            r"(\d+(?:\.\d+)?|\.\d+)(?:\s*(?:-|to)\s*(\d+(?:\.\d+)?|\.\d+))?\s*(?:{})\b",
            $unit
        ))
        .unwrap()
    };
}

// Bounds further apart than this are a label and a value ("Unit 3 - 2,500
// sq ft"), not a range.
const MAX_RANGE_RATIO: f64 = 10.0;

lazy_static! {
    // Superscript spellings rewritten before the unit search.
    static ref UNIT_SPELLINGS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"ft²|ft\^2").unwrap(), " sq ft"),
        (Regex::new(r"m²|m\^2").unwrap(), " sqm"),
    ];

    static ref SQFT: Regex =
        measure!(r"sq\.?\s*ft|sq\.?\s*feet|sqft|square\s+f(?:ee|oo)t|ft2|sf");
    static ref SQM: Regex =
        measure!(r"sq\.?\s*m|sqm|sq\.?\s*met(?:re|er)s?|square\s+met(?:re|er)s?|m2");
    static ref ACRES: Regex = measure!(r"acres?|ac");
    static ref HECTARES: Regex = measure!(r"hectares?|ha");
}

fn normalize_units(text: &str) -> String {
    let mut folded = fold_for_matching(text);
    for (pattern, replacement) in UNIT_SPELLINGS.iter() {
        folded = pattern.replace_all(&folded, *replacement).into_owned();
    }
    folded
}

fn is_range(a: f64, b: f64) -> bool {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    low > 0.0 && high <= low * MAX_RANGE_RATIO
}

/// First value for the unit; a range resolves to its lower bound.
fn first_measure(pattern: &Regex, text: &str) -> Option<f64> {
    let caps = pattern.captures(text)?;
    let first = parse_number(caps.get(1)?.as_str())?;
    match caps.get(2).and_then(|m| parse_number(m.as_str())) {
        Some(second) if is_range(first, second) => Some(first.min(second)),
        Some(second) => Some(second),
        None => Some(first),
    }
}

/// Extracts floor area (sqft, falling back to converted sqm) and land area
/// (acres, falling back to converted hectares) from free text.
pub fn extract_size(text: &str) -> SizeMeasurement {
    let text = normalize_units(text);

    let sqft = first_measure(&SQFT, &text)
        .or_else(|| first_measure(&SQM, &text).map(|sqm| sqm * SQFT_PER_SQM));
    let acres = first_measure(&ACRES, &text)
        .or_else(|| first_measure(&HECTARES, &text).map(|ha| ha * ACRES_PER_HECTARE));

    SizeMeasurement {
        sqft: sqft.map(round3),
        acres: acres.map(round3),
    }
}
