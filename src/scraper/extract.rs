// src/scraper/extract.rs

use super::document::Document;
use super::source::{FieldSelector, LinkSelector, SourceSpec};
use crate::domain::{ListingRecord, SaleType, Tenure};
use crate::errors::Result;
use crate::normalize::text::{dedup_preserving_order, round3};
use crate::normalize::{
    extract_postcode, extract_price, extract_size, extract_tenure, normalize_sale_type,
    terminal_marker, SQFT_PER_ACRE,
};
use tracing::debug;

fn fragments(doc: &Document, selectors: &[FieldSelector]) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for selector in selectors {
        match selector {
            FieldSelector::Text(css) => out.extend(doc.select_texts(css)?),
            FieldSelector::Attr { css, attr } => out.extend(doc.select_attrs(css, attr)?),
        }
    }
    Ok(out)
}

/// All fragments of a field, space-joined.
fn joined(doc: &Document, selectors: &[FieldSelector]) -> Result<String> {
    Ok(fragments(doc, selectors)?.join(" "))
}

fn links(doc: &Document, selectors: &[LinkSelector]) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for selector in selectors {
        out.extend(doc.select_links(&selector.css, &selector.attr)?);
    }
    Ok(dedup_preserving_order(out))
}

fn strip_scheme(value: &str, scheme: &str) -> String {
    let value = value.trim();
    let value = value
        .get(..scheme.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
        .map_or(value, |_| &value[scheme.len()..]);
    // mailto links often carry "?subject=..."
    value.split('?').next().unwrap_or("").trim().to_string()
}

/// Sale type from the status and sale-type fragments, then the source
/// default, then whatever the price text implies ("£950 pcm").
fn decide_sale_type(spec: &SourceSpec, labels: &str, price_text: &str) -> SaleType {
    match normalize_sale_type(labels) {
        SaleType::Unknown => match spec.default_sale_type {
            Some(sale_type) if sale_type != SaleType::Unknown => sale_type,
            _ => normalize_sale_type(price_text),
        },
        sale_type => sale_type,
    }
}

/// Builds the canonical record for one listing page.
///
/// Returns `Ok(None)` when the status fragments carry a terminal marker
/// (sold, let agreed, under offer, withdrawn).
pub fn extract_listing(
    doc: &Document,
    listing_url: &str,
    spec: &SourceSpec,
) -> Result<Option<ListingRecord>> {
    let fields = &spec.fields;

    let status = joined(doc, &fields.status)?;
    if let Some(marker) = terminal_marker(&status) {
        debug!(source = %spec.name, url = listing_url, %marker, "dropping listing");
        return Ok(None);
    }

    let labels = format!("{} {}", status, joined(doc, &fields.sale_type)?);
    let price_text = joined(doc, &fields.price)?;
    let sale_type = decide_sale_type(spec, &labels, &price_text);

    let description = joined(doc, &fields.description)?;
    let display_address = joined(doc, &fields.address)?;

    let mut size = extract_size(&joined(doc, &fields.size)?);
    if size.is_empty() {
        size = extract_size(&description);
    }
    if spec.derive_acres_from_sqft && size.acres.is_none() {
        size.acres = size.sqft.map(|sqft| round3(sqft / SQFT_PER_ACRE));
    }

    let tenure = match extract_tenure(&joined(doc, &fields.tenure)?) {
        Tenure::Unknown => extract_tenure(&description),
        tenure => tenure,
    };

    let postal_code = extract_postcode(&joined(doc, &fields.postcode)?)
        .or_else(|| extract_postcode(&display_address));

    let agent_street = joined(doc, &fields.agent_street)?;
    let agent_postcode = extract_postcode(&joined(doc, &fields.agent_postcode)?)
        .or_else(|| extract_postcode(&agent_street))
        .unwrap_or_default();

    let agent_email = fragments(doc, &fields.agent_email)?
        .first()
        .map(|v| strip_scheme(v, "mailto:"))
        .unwrap_or_default();
    let agent_phone = fragments(doc, &fields.agent_phone)?
        .first()
        .map(|v| strip_scheme(v, "tel:"))
        .unwrap_or_default();

    Ok(Some(ListingRecord {
        listing_url: listing_url.to_string(),
        display_address,
        price: extract_price(&price_text, sale_type, spec.price_rule),
        property_sub_type: joined(doc, &fields.sub_type)?,
        property_image: links(doc, &fields.images)?,
        detailed_description: description,
        size_ft: size.sqft,
        size_ac: size.acres,
        postal_code,
        brochure_url: links(doc, &fields.brochures)?,
        agent_company: joined(doc, &fields.agent_company)?,
        agent_name: joined(doc, &fields.agent_name)?,
        agent_city: joined(doc, &fields.agent_city)?,
        agent_email,
        agent_phone,
        agent_street,
        agent_postcode,
        tenure,
        sale_type,
    }))
}
