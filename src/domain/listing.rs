// src/domain/listing.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Legal tenure of a listing. `Unknown` is written out as an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tenure {
    Freehold,
    Leasehold,
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl Tenure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tenure::Freehold => "Freehold",
            Tenure::Leasehold => "Leasehold",
            Tenure::Unknown => "",
        }
    }

    /// Inverse of [`Tenure::as_str`]. Anything unrecognised is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Freehold" => Tenure::Freehold,
            "Leasehold" => Tenure::Leasehold,
            _ => Tenure::Unknown,
        }
    }
}

impl fmt::Display for Tenure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a listing is offered for sale or to let.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaleType {
    #[serde(rename = "For Sale")]
    ForSale,
    #[serde(rename = "To Let")]
    ToLet,
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl SaleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleType::ForSale => "For Sale",
            SaleType::ToLet => "To Let",
            SaleType::Unknown => "",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "For Sale" => SaleType::ForSale,
            "To Let" => SaleType::ToLet,
            _ => SaleType::Unknown,
        }
    }
}

impl fmt::Display for SaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing as scraped from one source, flattened and normalized into the
/// shape shared by every source.
///
/// `listing_url` is the key used to reconcile runs; a record with an empty
/// URL is carried through but can never be matched against a previous run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingRecord {
    pub listing_url: String,
    pub display_address: String,
    /// Only ever set for `SaleType::ForSale`.
    pub price: Option<i64>,
    pub property_sub_type: String,
    pub property_image: Vec<String>,
    pub detailed_description: String,
    pub size_ft: Option<f64>,
    pub size_ac: Option<f64>,
    pub postal_code: Option<String>,
    pub brochure_url: Vec<String>,

    // Agent details, best effort
    pub agent_company: String,
    pub agent_name: String,
    pub agent_city: String,
    pub agent_email: String,
    pub agent_phone: String,
    pub agent_street: String,
    pub agent_postcode: String,

    pub tenure: Tenure,
    pub sale_type: SaleType,
}

impl ListingRecord {
    pub fn new(listing_url: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
            ..Default::default()
        }
    }

    /// Records without a URL cannot be reconciled between runs.
    pub fn is_keyed(&self) -> bool {
        !self.listing_url.trim().is_empty()
    }
}
