// src/scraper/fetcher.rs

use super::document::Document;
use crate::config::Settings;
use crate::errors::{ListingsError, Result};
use reqwest::blocking::Client;
use tracing::debug;

/// Anything that can turn a URL into a parsed document. The crawler only
/// talks to pages through this.
pub trait DocumentProvider {
    fn fetch(&self, url: &str) -> Result<Document>;
}

/// Fetches pages over HTTP with a blocking `reqwest` client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl DocumentProvider for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Document> {
        let start = std::time::Instant::now();
        let resp = self.client.get(url).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ListingsError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Redirects are followed, so tag the document with where we ended up.
        let final_url = resp.url().to_string();
        let body = resp.text()?;
        debug!(url, final_url = %final_url, elapsed = ?start.elapsed(), "fetched page");

        Document::parse(&final_url, &body)
    }
}
