// src/scraper/crawler.rs

use super::extract::extract_listing;
use super::fetcher::DocumentProvider;
use super::source::SourceSpec;
use crate::config::Settings;
use crate::domain::ListingRecord;
use crate::errors::Result;
use chrono::{NaiveDateTime, Utc};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Why traversal of a source ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last page had no listing URL that wasn't already seen.
    NoNewListings,
    /// The source's "next page" link was missing.
    NoNextPage,
    /// Pagination landed back on a page we had already fetched.
    RepeatedPage,
    /// Hit the page ceiling.
    PageLimit,
    /// A result page could not be fetched or read.
    ListPageFailed,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::NoNewListings => "no_new_listings",
            StopReason::NoNextPage => "no_next_page",
            StopReason::RepeatedPage => "repeated_page",
            StopReason::PageLimit => "page_limit",
            StopReason::ListPageFailed => "list_page_failed",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bookkeeping for one source's traversal, stored in `scrape_runs`.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub source: String,
    pub started_at: NaiveDateTime,
    pub finished_at: NaiveDateTime,
    pub pages_fetched: usize,
    pub listings: usize,
    /// Dropped because of a terminal status (sold, let agreed, ...).
    pub discarded: usize,
    /// Skipped because fetching or extracting the detail page failed.
    pub failed: usize,
    pub stop_reason: StopReason,
}

impl CrawlReport {
    /// A source only counts as failed when not even its first result page
    /// could be read.
    pub fn success(&self) -> bool {
        !(self.stop_reason == StopReason::ListPageFailed && self.pages_fetched == 0)
    }
}

pub struct CrawlOutcome {
    pub records: Vec<ListingRecord>,
    pub report: CrawlReport,
}

enum CrawlState {
    /// Fetch the result page with this 0-based index.
    Discovering { page: u32 },
    /// Extract freshly discovered listings, then move to `next`.
    Extracting {
        pending: VecDeque<String>,
        next: Option<u32>,
    },
    Done(StopReason),
}

/// Walks one source's result pages, extracting each listing URL once.
pub struct Crawler<'a, P: DocumentProvider> {
    provider: &'a P,
    spec: &'a SourceSpec,
    max_pages: u32,
    page_delay: Duration,
    seen: HashSet<String>,
    visited_pages: HashSet<String>,
    records: Vec<ListingRecord>,
    pages_fetched: usize,
    discarded: usize,
    failed: usize,
}

impl<'a, P: DocumentProvider> Crawler<'a, P> {
    pub fn new(provider: &'a P, spec: &'a SourceSpec, settings: &Settings) -> Self {
        Self::with_limits(
            provider,
            spec,
            spec.page_limit(settings.max_pages),
            settings.page_delay,
        )
    }

    pub fn with_limits(
        provider: &'a P,
        spec: &'a SourceSpec,
        max_pages: u32,
        page_delay: Duration,
    ) -> Self {
        Self {
            provider,
            spec,
            max_pages,
            page_delay,
            seen: HashSet::new(),
            visited_pages: HashSet::new(),
            records: Vec::new(),
            pages_fetched: 0,
            discarded: 0,
            failed: 0,
        }
    }

    /// Runs the traversal to completion. Never fails: list page errors end
    /// the crawl, listing errors skip the listing.
    pub fn run(mut self) -> CrawlOutcome {
        let started_at = Utc::now().naive_utc();
        let mut state = CrawlState::Discovering { page: 0 };

        let stop_reason = loop {
            state = match state {
                CrawlState::Discovering { page } => self.discover(page),
                CrawlState::Extracting { pending, next } => {
                    self.extract_all(pending);
                    match next {
                        Some(page) => CrawlState::Discovering { page },
                        None => CrawlState::Done(StopReason::NoNextPage),
                    }
                }
                CrawlState::Done(reason) => break reason,
            };
        };

        let report = CrawlReport {
            source: self.spec.name.clone(),
            started_at,
            finished_at: Utc::now().naive_utc(),
            pages_fetched: self.pages_fetched,
            listings: self.records.len(),
            discarded: self.discarded,
            failed: self.failed,
            stop_reason,
        };

        info!(
            source = %report.source,
            pages = report.pages_fetched,
            listings = report.listings,
            discarded = report.discarded,
            failed = report.failed,
            stop = %report.stop_reason,
            "crawl finished"
        );

        CrawlOutcome {
            records: self.records,
            report,
        }
    }

    fn discover(&mut self, page: u32) -> CrawlState {
        if page >= self.max_pages {
            warn!(source = %self.spec.name, max_pages = self.max_pages, "page ceiling reached");
            return CrawlState::Done(StopReason::PageLimit);
        }
        if page > 0 && !self.page_delay.is_zero() {
            std::thread::sleep(self.page_delay);
        }

        let page_url = self.spec.page_url(page);
        info!(source = %self.spec.name, page = page + 1, url = %page_url, "scraping page");

        let doc = match self.provider.fetch(&page_url) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(source = %self.spec.name, url = %page_url, error = %e, "result page failed, stopping");
                return CrawlState::Done(StopReason::ListPageFailed);
            }
        };
        self.pages_fetched += 1;

        if !self.visited_pages.insert(doc.url().to_string()) {
            info!(source = %self.spec.name, url = doc.url(), "pagination repeated a page, stopping");
            return CrawlState::Done(StopReason::RepeatedPage);
        }

        let link = &self.spec.listing_link;
        let candidates = match doc.select_links(&link.css, &link.attr) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(source = %self.spec.name, error = %e, "cannot read result page, stopping");
                return CrawlState::Done(StopReason::ListPageFailed);
            }
        };

        let fresh: VecDeque<String> = candidates
            .into_iter()
            .filter(|url| self.seen.insert(url.clone()))
            .collect();

        if fresh.is_empty() {
            info!(source = %self.spec.name, page = page + 1, "no new listings, stopping");
            return CrawlState::Done(StopReason::NoNewListings);
        }
        debug!(source = %self.spec.name, page = page + 1, fresh = fresh.len(), "discovered listings");

        let has_next = match &self.spec.next_page {
            Some(css) => match doc.exists(css) {
                Ok(found) => found,
                Err(e) => {
                    warn!(source = %self.spec.name, error = %e, "cannot read next-page link, treating as last page");
                    false
                }
            },
            None => true,
        };

        CrawlState::Extracting {
            pending: fresh,
            next: has_next.then_some(page + 1),
        }
    }

    fn extract_all(&mut self, pending: VecDeque<String>) {
        for url in pending {
            match self.extract_one(&url) {
                Ok(Some(record)) => self.records.push(record),
                Ok(None) => self.discarded += 1,
                Err(e) => {
                    self.failed += 1;
                    warn!(source = %self.spec.name, url = %url, error = %e, "skipping listing");
                }
            }
        }
    }

    fn extract_one(&self, url: &str) -> Result<Option<ListingRecord>> {
        let doc = self.provider.fetch(url)?;
        extract_listing(&doc, url, self.spec)
    }
}

/// Convenience wrapper: crawl one source with the run settings.
pub fn crawl_source<P: DocumentProvider>(
    provider: &P,
    spec: &SourceSpec,
    settings: &Settings,
) -> CrawlOutcome {
    Crawler::new(provider, spec, settings).run()
}
