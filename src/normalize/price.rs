// src/normalize/price.rs

use super::text::{fold_for_matching, parse_number};
use crate::domain::SaleType;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Which currency figure to use when a text quotes more than one.
///
/// Chosen once per source and never mixed within a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceRule {
    /// The first currency figure in the text.
    #[default]
    First,
    /// The smallest currency figure anywhere in the text.
    Lowest,
}

lazy_static! {
    static ref PRICE_WITHHELD: Regex = Regex::new(
        r"\b(?:poa|p\.o\.a|price\s+on\s+application|(?:up)?on\s+application|subject\s+to\s+offers?|tbc|ask\s+(?:the\s+)?agent)\b"
    ).unwrap();

    static ref RENT_PERIOD: Regex = Regex::new(
        r"\b(?:per\s+annum|pa|p\.a|pcm|per\s+calendar\s+month|per\s+month|pw|p\.w|per\s+week|rents?|rental)\b"
    ).unwrap();

    // "£1.2m", "£250000", "£1.1 - 1.4 million", "gbp 300000 to £350000"
    static ref CURRENCY_FIGURE: Regex = Regex::new(
        r"(?:£|gbp)\s*(\d+(?:\.\d+)?|\.\d+)\s*(million\b|m\b)?(?:\s*(?:-|to)\s*(£|gbp)?\s*(\d+(?:\.\d+)?|\.\d+)\s*(million\b|m\b)?)?"
    ).unwrap();
}

const MILLION: f64 = 1_000_000.0;

/// Value of one currency figure. A range resolves to its lower bound; a
/// multiplier written only after the upper bound applies to both.
///
/// An upper bound with neither a currency sign nor a multiplier only counts
/// when it is no smaller than the lower one, so "£425,000 - 4 bedroom house"
/// stays at 425000.
fn figure_value(caps: &Captures) -> Option<f64> {
    let low_mult = caps.get(2).map(|_| MILLION);
    let high_mult = caps.get(5).map(|_| MILLION);
    let marked = caps.get(3).is_some() || high_mult.is_some();

    let low = parse_number(caps.get(1)?.as_str())? * low_mult.or(high_mult).unwrap_or(1.0);
    let high = caps
        .get(4)
        .and_then(|m| parse_number(m.as_str()))
        .map(|high| high * high_mult.unwrap_or(1.0));

    let value = match high {
        Some(high) if marked || high >= low => low.min(high),
        _ => low,
    };
    Some(value)
}

fn to_whole(value: f64) -> Option<i64> {
    // Settle to pence first so "£0.29m" doesn't floor to 289999.
    let whole = ((value * 100.0).round() / 100.0).floor();
    (whole >= 0.0 && whole < i64::MAX as f64).then_some(whole as i64)
}

/// Extracts an asking price from free text.
///
/// Returns `None` unless the listing is for sale, when the price is
/// withheld, and when the text carries a rent period (so a rent quoted in
/// the same description never lands in the sale price).
pub fn extract_price(text: &str, sale_type: SaleType, rule: PriceRule) -> Option<i64> {
    if sale_type != SaleType::ForSale {
        return None;
    }

    let text = fold_for_matching(text);
    if PRICE_WITHHELD.is_match(&text) || RENT_PERIOD.is_match(&text) {
        return None;
    }

    let mut figures = CURRENCY_FIGURE
        .captures_iter(&text)
        .filter_map(|caps| figure_value(&caps));

    let value = match rule {
        PriceRule::First => figures.next(),
        PriceRule::Lowest => figures.reduce(f64::min),
    }?;
    to_whole(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn for_sale(text: &str) -> Option<i64> {
        extract_price(text, SaleType::ForSale, PriceRule::First)
    }

    #[test]
    fn plain_and_million_prices() {
        assert_eq!(for_sale("£250,000"), Some(250000));
        assert_eq!(for_sale("£2.5 million"), Some(2500000));
        assert_eq!(for_sale("Guide price £1.25m"), Some(1250000));
        assert_eq!(for_sale("£99,999.99"), Some(99999));
    }

    #[test]
    fn never_priced_unless_for_sale() {
        for sale_type in [SaleType::ToLet, SaleType::Unknown] {
            assert_eq!(extract_price("£250,000", sale_type, PriceRule::First), None);
            assert_eq!(extract_price("£2.5 million", sale_type, PriceRule::Lowest), None);
        }
    }

    #[test]
    fn withheld_prices_are_absent() {
        assert_eq!(for_sale("POA"), None);
        assert_eq!(for_sale("Price on application"), None);
        assert_eq!(for_sale("Offers invited, price upon application"), None);
        assert_eq!(for_sale("Price TBC"), None);
        assert_eq!(for_sale("Ask agent"), None);
    }

    #[test]
    fn rent_periods_block_the_sale_price() {
        assert_eq!(for_sale("£18,500 per annum exclusive"), None);
        assert_eq!(for_sale("£1,200 pcm"), None);
        assert_eq!(for_sale("£450,000 or available to rent"), None);
    }

    #[test]
    fn ranges_use_the_lower_bound() {
        assert_eq!(for_sale("£300,000 - £350,000"), Some(300000));
        assert_eq!(for_sale("£1.4 to 1.1 million"), Some(1100000));
    }

    #[test]
    fn bare_trailing_number_is_not_an_upper_bound() {
        assert_eq!(for_sale("Guide price £425,000 - 4 bedroom detached house"), Some(425000));
        assert_eq!(for_sale("£1.5m - 2 storey office building"), Some(1500000));
        assert_eq!(for_sale("£300,000 - 350,000"), Some(300000));
        assert_eq!(for_sale("£1.1 - 1.4 million"), Some(1100000));
        assert_eq!(for_sale("£350,000 - £300,000"), Some(300000));
    }

    #[test]
    fn leading_decimal_point_is_kept() {
        assert_eq!(for_sale("£.5m"), Some(500000));
        assert_eq!(for_sale("Offers around £.75 million"), Some(750000));
    }

    #[test]
    fn price_rule_picks_first_or_lowest() {
        let text = "Freehold £425,000. Adjoining plot also available at £95,000";
        assert_eq!(extract_price(text, SaleType::ForSale, PriceRule::First), Some(425000));
        assert_eq!(extract_price(text, SaleType::ForSale, PriceRule::Lowest), Some(95000));
    }

    #[test]
    fn no_currency_figure_means_no_price() {
        assert_eq!(for_sale("Offers in excess of 250,000"), None);
        assert_eq!(for_sale(""), None);
    }
}
