// src/domain/changes.rs

use super::listing::{ListingRecord, SaleType, Tenure};

/// A single change to a tracked field between the previous snapshot and the
/// current run, stored in `listing_history`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub listing_url: String,
    pub field_name: String,
    pub previous_value: String,
    pub current_value: String,
}

/// Compares the tracked fields of a listing as it was last persisted with the
/// version scraped in this run.
pub fn diff_record(previous: &ListingRecord, current: &ListingRecord) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    // Absent values are logged as an empty string.
    macro_rules! compare_and_log {
        ($field:ident, $field_name:expr, $render:expr) => {
            if previous.$field != current.$field {
                let render = $render;
                changes.push(FieldChange {
                    listing_url: current.listing_url.clone(),
                    field_name: $field_name.to_string(),
                    previous_value: render(&previous.$field),
                    current_value: render(&current.$field),
                });
            }
        };
    }

    let opt = |v: &Option<i64>| v.map(|p| p.to_string()).unwrap_or_default();
    let opt_f = |v: &Option<f64>| v.map(|p| p.to_string()).unwrap_or_default();
    let opt_s = |v: &Option<String>| v.clone().unwrap_or_default();
    let plain = |v: &String| v.clone();
    let sale = |v: &SaleType| v.as_str().to_string();
    let tenure = |v: &Tenure| v.as_str().to_string();

    compare_and_log!(price, "price", opt);
    compare_and_log!(sale_type, "sale_type", sale);
    compare_and_log!(tenure, "tenure", tenure);
    compare_and_log!(size_ft, "size_ft", opt_f);
    compare_and_log!(size_ac, "size_ac", opt_f);
    compare_and_log!(postal_code, "postal_code", opt_s);
    compare_and_log!(display_address, "display_address", plain);
    compare_and_log!(property_sub_type, "property_sub_type", plain);

    changes
}
