// src/normalize/postcode.rs

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Outward code, optional space, inward code: "LS1 4DY", "SW1A 1AA", "M11AE".
    static ref FULL_POSTCODE: Regex =
        Regex::new(r"\b([A-Z]{1,2}[0-9]{1,2}[A-Z]?)\s*([0-9][A-Z]{2})\b").unwrap();

    // Outward code only: "LS1", "EC2A".
    static ref OUTWARD_CODE: Regex = Regex::new(r"\b([A-Z]{1,2}[0-9]{1,2}[A-Z]?)\b").unwrap();
}

/// Finds a UK postcode, preferring a full one and falling back to the
/// outward code alone. Full postcodes are returned as `OUTWARD INWARD`.
pub fn extract_postcode(text: &str) -> Option<String> {
    let text = text.to_uppercase();

    if let Some(caps) = FULL_POSTCODE.captures(&text) {
        return Some(format!("{} {}", &caps[1], &caps[2]));
    }

    OUTWARD_CODE
        .captures(&text)
        .map(|caps| caps[1].to_string())
}
