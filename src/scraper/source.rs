// src/scraper/source.rs
//
// Sources are described as data: which selectors feed which canonical field,
// how result pages are numbered, and the few per-source rules (price rule,
// default sale type). One generic extractor consumes these.

use super::document::parse_selector;
use crate::domain::SaleType;
use crate::errors::{ListingsError, Result};
use crate::normalize::PriceRule;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A selector for one field. Either the element's text, or one of its
/// attributes:
///
/// ```json
/// "h1.address"
/// { "css": "a.email", "attr": "href" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSelector {
    Text(String),
    Attr { css: String, attr: String },
}

impl FieldSelector {
    pub fn css(&self) -> &str {
        match self {
            FieldSelector::Text(css) => css,
            FieldSelector::Attr { css, .. } => css,
        }
    }
}

fn default_href() -> String {
    "href".to_string()
}

/// A selector whose attribute holds a URL (listing links, images, brochures).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSelector {
    pub css: String,
    #[serde(default = "default_href")]
    pub attr: String,
}

/// Selectors per canonical field. Fragments from every selector of a field
/// are concatenated, in order, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSelectors {
    pub address: Vec<FieldSelector>,
    pub sub_type: Vec<FieldSelector>,
    pub description: Vec<FieldSelector>,
    pub size: Vec<FieldSelector>,
    pub price: Vec<FieldSelector>,
    pub tenure: Vec<FieldSelector>,
    pub postcode: Vec<FieldSelector>,
    /// Status badges; the only fragments checked for sold/let agreed.
    pub status: Vec<FieldSelector>,
    pub sale_type: Vec<FieldSelector>,

    pub agent_company: Vec<FieldSelector>,
    pub agent_name: Vec<FieldSelector>,
    pub agent_city: Vec<FieldSelector>,
    pub agent_email: Vec<FieldSelector>,
    pub agent_phone: Vec<FieldSelector>,
    pub agent_street: Vec<FieldSelector>,
    pub agent_postcode: Vec<FieldSelector>,

    pub images: Vec<LinkSelector>,
    pub brochures: Vec<LinkSelector>,
}

impl FieldSelectors {
    fn all_css(&self) -> impl Iterator<Item = &str> {
        [
            &self.address,
            &self.sub_type,
            &self.description,
            &self.size,
            &self.price,
            &self.tenure,
            &self.postcode,
            &self.status,
            &self.sale_type,
            &self.agent_company,
            &self.agent_name,
            &self.agent_city,
            &self.agent_email,
            &self.agent_phone,
            &self.agent_street,
            &self.agent_postcode,
        ]
        .into_iter()
        .flatten()
        .map(FieldSelector::css)
        .chain(self.images.iter().map(|s| s.css.as_str()))
        .chain(self.brochures.iter().map(|s| s.css.as_str()))
    }
}

fn one() -> u32 {
    1
}

/// How to crawl and read one listings site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    /// Result page URL with a `{page}` placeholder.
    pub list_url: String,
    #[serde(default = "one")]
    pub first_page: u32,
    /// Increment between pages; offset-paged sites use e.g. 24.
    #[serde(default = "one")]
    pub page_step: u32,
    pub listing_link: LinkSelector,
    /// When set, a page without a match is the last page.
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub max_pages: Option<u32>,
    #[serde(default)]
    pub price_rule: PriceRule,
    /// Used when neither status nor sale-type fragments say sale or let.
    #[serde(default)]
    pub default_sale_type: Option<SaleType>,
    /// Fill acreage from square footage when the site only quotes the latter.
    #[serde(default)]
    pub derive_acres_from_sqft: bool,
    #[serde(default)]
    pub fields: FieldSelectors,
}

impl SourceSpec {
    /// URL of the `index`-th result page (0-based), following the source's
    /// page numbering.
    pub fn page_url(&self, index: u32) -> String {
        let page = self.first_page.saturating_add(index.saturating_mul(self.page_step));
        self.list_url.replace("{page}", &page.to_string())
    }

    /// Page ceiling for this source: its own limit, capped by the global one.
    pub fn page_limit(&self, global_max: u32) -> u32 {
        self.max_pages.map_or(global_max, |m| m.min(global_max))
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| ListingsError::Config(format!("source '{}': {msg}", self.name));

        if self.name.trim().is_empty() {
            return Err(ListingsError::Config("source with an empty name".into()));
        }
        if !self.list_url.contains("{page}") {
            return Err(invalid("list_url has no {page} placeholder".into()));
        }
        url::Url::parse(&self.page_url(0)).map_err(|e| invalid(format!("list_url: {e}")))?;
        if self.page_step == 0 {
            return Err(invalid("page_step must be at least 1".into()));
        }

        parse_selector(&self.listing_link.css)?;
        if let Some(css) = &self.next_page {
            parse_selector(css)?;
        }
        for css in self.fields.all_css() {
            parse_selector(css)?;
        }
        Ok(())
    }
}

/// Loads and validates the JSON array of source definitions.
pub fn load_sources(path: &Path) -> Result<Vec<SourceSpec>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ListingsError::Config(format!("cannot read sources file {}: {e}", path.display()))
    })?;
    parse_sources(&raw)
}

pub fn parse_sources(raw: &str) -> Result<Vec<SourceSpec>> {
    let sources: Vec<SourceSpec> = serde_json::from_str(raw)?;
    for source in &sources {
        source.validate()?;
    }
    Ok(sources)
}
