// src/scraper/document.rs

use crate::errors::{ListingsError, Result};
use crate::normalize::text::collapse_whitespace;
use scraper::{Html, Selector};
use url::Url;

/// A parsed page together with the URL it was served from (after any
/// redirects), so relative links resolve against the right base.
pub struct Document {
    html: Html,
    url: Url,
}

pub fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ListingsError::Selector(format!("{css}: {e}")))
}

impl Document {
    pub fn parse(url: &str, html: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| ListingsError::Url(format!("{url}: {e}")))?;
        Ok(Self {
            html: Html::parse_document(html),
            url,
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Text of every element matching `css`, whitespace-collapsed, empty
    /// matches dropped.
    pub fn select_texts(&self, css: &str) -> Result<Vec<String>> {
        let selector = parse_selector(css)?;
        Ok(self
            .html
            .select(&selector)
            .map(|el| collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")))
            .filter(|t| !t.is_empty())
            .collect())
    }

    /// Attribute values of every element matching `css`, resolved to
    /// absolute URLs without fragments.
    pub fn select_links(&self, css: &str, attr: &str) -> Result<Vec<String>> {
        let selector = parse_selector(css)?;
        Ok(self
            .html
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .filter_map(|href| self.canonical_url(href))
            .collect())
    }

    /// Raw attribute values, for things like `mailto:` links that are not
    /// page URLs.
    pub fn select_attrs(&self, css: &str, attr: &str) -> Result<Vec<String>> {
        let selector = parse_selector(css)?;
        Ok(self
            .html
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect())
    }

    pub fn exists(&self, css: &str) -> Result<bool> {
        let selector = parse_selector(css)?;
        Ok(self.html.select(&selector).next().is_some())
    }

    /// Resolves `href` against this page and drops the fragment. Links
    /// that cannot be resolved (or are `javascript:`/`mailto:`) yield `None`.
    pub fn canonical_url(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }
        let mut resolved = self.url.join(href).ok()?;
        if !matches!(resolved.scheme(), "http" | "https") {
            return None;
        }
        resolved.set_fragment(None);
        Some(resolved.to_string())
    }
}
