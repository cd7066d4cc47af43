// src/normalize/tenure.rs

use crate::domain::Tenure;

/// Checked in order; freehold is tested first even when both appear.
const TENURE_RULES: &[(&str, Tenure)] = &[
    ("freehold", Tenure::Freehold),
    ("leasehold", Tenure::Leasehold),
];

pub fn extract_tenure(text: &str) -> Tenure {
    let text = text.to_lowercase();
    TENURE_RULES
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, tenure)| *tenure)
        .unwrap_or(Tenure::Unknown)
}
