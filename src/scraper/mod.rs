mod crawler;
mod document;
mod extract;
mod fetcher;
mod source;

pub use crawler::{crawl_source, CrawlOutcome, CrawlReport, Crawler, StopReason};
pub use document::Document;
pub use extract::extract_listing;
pub use fetcher::{DocumentProvider, HttpFetcher};
pub use source::{load_sources, parse_sources, FieldSelector, FieldSelectors, LinkSelector, SourceSpec};
