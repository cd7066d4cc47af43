// src/normalize/sale_type.rs

use crate::domain::SaleType;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

/// A status that means the listing is no longer on the market. Listings
/// carrying one are dropped, not tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalMarker {
    Sold,
    LetAgreed,
    UnderOffer,
    Withdrawn,
}

impl fmt::Display for TerminalMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TerminalMarker::Sold => "sold",
            TerminalMarker::LetAgreed => "let agreed",
            TerminalMarker::UnderOffer => "under offer",
            TerminalMarker::Withdrawn => "withdrawn",
        };
        f.write_str(label)
    }
}

lazy_static! {
    /// Checked in order: a text naming both families is for sale.
    static ref SALE_TYPE_RULES: Vec<(Regex, SaleType)> = vec![
        (
            Regex::new(r"\b(?:for\s+sale|sale|offers|guide\s+price|asking\s+price|freehold)\b").unwrap(),
            SaleType::ForSale,
        ),
        (
            Regex::new(r"\b(?:to\s+let|let|letting|rent|rental|pcm|lease|per\s+annum)\b").unwrap(),
            SaleType::ToLet,
        ),
    ];

    static ref TERMINAL_RULES: Vec<(Regex, TerminalMarker)> = vec![
        (Regex::new(r"\b(?:sold(?:\s+stc)?|sstc)\b").unwrap(), TerminalMarker::Sold),
        (Regex::new(r"\blet\s+(?:agreed|stc)\b").unwrap(), TerminalMarker::LetAgreed),
        (Regex::new(r"\bunder\s+offer\b").unwrap(), TerminalMarker::UnderOffer),
        (Regex::new(r"\bwithdrawn\b").unwrap(), TerminalMarker::Withdrawn),
    ];
}

/// Classifies a text as for sale or to let. Sale terms are checked first.
pub fn normalize_sale_type(text: &str) -> SaleType {
    let text = text.to_lowercase();
    SALE_TYPE_RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(&text))
        .map(|(_, sale_type)| *sale_type)
        .unwrap_or(SaleType::Unknown)
}

/// Returns the first terminal marker found in a status text.
///
/// Only meant for status badges and labels; a free-text description
/// mentioning "sold" would otherwise drop a live listing.
pub fn terminal_marker(text: &str) -> Option<TerminalMarker> {
    let text = text.to_lowercase();
    TERMINAL_RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(&text))
        .map(|(_, marker)| *marker)
}
