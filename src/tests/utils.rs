use crate::db::{init_db, Database};
use crate::errors::{ListingsError, Result};
use crate::scraper::{parse_sources, Document, DocumentProvider, SourceSpec};
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns a fresh test database with the production schema.
pub fn make_db(prefix: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "{prefix}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db).expect("Failed to initialize DB");
    db
}

/// Serves canned HTML and counts fetches per URL.
#[derive(Default)]
pub struct StaticSite {
    pages: HashMap<String, String>,
    redirects: HashMap<String, String>,
    fetches: RefCell<HashMap<String, usize>>,
}

impl StaticSite {
    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches.borrow().get(url).copied().unwrap_or(0)
    }
}

impl DocumentProvider for StaticSite {
    fn fetch(&self, url: &str) -> Result<Document> {
        *self.fetches.borrow_mut().entry(url.to_string()).or_default() += 1;

        let final_url = self.redirects.get(url).map(String::as_str).unwrap_or(url);
        match self.pages.get(final_url) {
            Some(html) => Document::parse(final_url, html),
            None => Err(ListingsError::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// A result page linking to the given listing paths.
pub fn results_page(paths: &[&str], has_next: bool) -> String {
    let cards: String = paths
        .iter()
        .map(|p| format!(r#"<div class="card"><a class="property-link" href="{p}">View</a></div>"#))
        .collect();
    let next = if has_next { r#"<a class="next" href="?page=next">Next</a>"# } else { "" };
    format!("<html><body>{cards}{next}</body></html>")
}

/// A listing page with the given status badge.
pub fn detail_page(address: &str, status: &str, price: &str) -> String {
    format!(
        r#"<html><body>
            <span class="badge">{status}</span>
            <h1 class="address">{address}</h1>
            <p class="price">{price}</p>
            <div class="description">Open plan office of 2,400 sq ft. Leasehold.</div>
        </body></html>"#
    )
}

pub fn test_source(next_page: bool) -> SourceSpec {
    let next = if next_page { r#""next_page": "a.next","# } else { "" };
    parse_sources(&format!(
        r#"[{{
            "name": "test-agents",
            "list_url": "https://agents.example/search?page={{page}}",
            {next}
            "listing_link": {{ "css": "a.property-link" }},
            "fields": {{
                "address": ["h1.address"],
                "description": [".description"],
                "price": [".price"],
                "status": [".badge"]
            }}
        }}]"#
    ))
    .unwrap()
    .remove(0)
}
