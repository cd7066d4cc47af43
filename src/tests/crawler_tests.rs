// src/tests/crawler_tests.rs

use super::utils::{detail_page, results_page, test_source, StaticSite};
use crate::domain::{SaleType, Tenure};
use crate::scraper::{Crawler, StopReason};
use std::time::Duration;

const PAGE_1: &str = "https://agents.example/search?page=1";
const PAGE_2: &str = "https://agents.example/search?page=2";
const PAGE_3: &str = "https://agents.example/search?page=3";

fn listing(n: u32) -> String {
    format!("https://agents.example/p/{n}")
}

fn three_page_site() -> StaticSite {
    StaticSite::default()
        .page(PAGE_1, &results_page(&["/p/1", "/p/2", "/p/1#gallery"], true))
        .page(PAGE_2, &results_page(&["/p/2", "/p/3"], true))
        .page(PAGE_3, &results_page(&["/p/3"], true))
        .page(&listing(1), &detail_page("1 Mill Lane, Leeds LS1 4DY", "For Sale", "£250,000"))
        .page(&listing(2), &detail_page("2 Mill Lane, Leeds LS1 4DY", "To Let", "£18,000 per annum"))
        .page(&listing(3), &detail_page("3 Mill Lane, Leeds LS1 4DY", "For Sale", "POA"))
}

#[test]
fn walks_pages_until_nothing_new() {
    let site = three_page_site();
    let spec = test_source(false);

    let outcome = Crawler::with_limits(&site, &spec, 100, Duration::ZERO).run();

    let urls: Vec<_> = outcome.records.iter().map(|r| r.listing_url.clone()).collect();
    assert_eq!(urls, vec![listing(1), listing(2), listing(3)]);
    assert_eq!(outcome.report.stop_reason, StopReason::NoNewListings);
    assert_eq!(outcome.report.pages_fetched, 3);
    assert!(outcome.report.success());

    // Each listing fetched once even though it was linked several times.
    for n in 1..=3 {
        assert_eq!(site.fetch_count(&listing(n)), 1);
    }
}

#[test]
fn records_are_normalized() {
    let site = three_page_site();
    let spec = test_source(false);
    let records = Crawler::with_limits(&site, &spec, 100, Duration::ZERO).run().records;

    let sale = &records[0];
    assert_eq!(sale.sale_type, SaleType::ForSale);
    assert_eq!(sale.price, Some(250000));
    assert_eq!(sale.size_ft, Some(2400.0));
    assert_eq!(sale.tenure, Tenure::Leasehold);
    assert_eq!(sale.postal_code.as_deref(), Some("LS1 4DY"));

    let letting = &records[1];
    assert_eq!(letting.sale_type, SaleType::ToLet);
    assert_eq!(letting.price, None);

    let withheld = &records[2];
    assert_eq!(withheld.sale_type, SaleType::ForSale);
    assert_eq!(withheld.price, None);
}

#[test]
fn repeated_crawls_yield_the_same_urls() {
    let spec = test_source(false);

    let first = Crawler::with_limits(&three_page_site(), &spec, 100, Duration::ZERO).run();
    let second = Crawler::with_limits(&three_page_site(), &spec, 100, Duration::ZERO).run();

    let urls = |records: &[crate::domain::ListingRecord]| {
        records.iter().map(|r| r.listing_url.clone()).collect::<Vec<_>>()
    };
    assert_eq!(urls(&first.records), urls(&second.records));
}

#[test]
fn terminal_and_broken_listings_are_skipped() {
    let site = StaticSite::default()
        .page(PAGE_1, &results_page(&["/p/1", "/p/2", "/p/404"], false))
        .page(&listing(1), &detail_page("1 Mill Lane", "Sold STC", "£250,000"))
        .page(&listing(2), &detail_page("2 Mill Lane", "For Sale", "£199,950"));
    let spec = test_source(false);

    let outcome = Crawler::with_limits(&site, &spec, 100, Duration::ZERO).run();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].listing_url, listing(2));
    assert_eq!(outcome.report.discarded, 1);
    assert_eq!(outcome.report.failed, 1);
    // Page 2 doesn't exist, which ends the crawl without failing the source.
    assert_eq!(outcome.report.stop_reason, StopReason::ListPageFailed);
    assert!(outcome.report.success());
}

#[test]
fn missing_next_link_ends_the_crawl() {
    let site = StaticSite::default()
        .page(PAGE_1, &results_page(&["/p/1"], false))
        .page(PAGE_2, &results_page(&["/p/2"], true))
        .page(&listing(1), &detail_page("1 Mill Lane", "For Sale", "£1m"))
        .page(&listing(2), &detail_page("2 Mill Lane", "For Sale", "£2m"));
    let spec = test_source(true);

    let outcome = Crawler::with_limits(&site, &spec, 100, Duration::ZERO).run();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.report.stop_reason, StopReason::NoNextPage);
    assert_eq!(site.fetch_count(PAGE_2), 0);
}

#[test]
fn redirect_to_an_earlier_page_ends_the_crawl() {
    let site = StaticSite::default()
        .page(PAGE_1, &results_page(&["/p/1"], true))
        .redirect(PAGE_2, PAGE_1)
        .page(&listing(1), &detail_page("1 Mill Lane", "For Sale", "£100,000"));
    let spec = test_source(false);

    let outcome = Crawler::with_limits(&site, &spec, 100, Duration::ZERO).run();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.report.stop_reason, StopReason::RepeatedPage);
}

#[test]
fn unreachable_first_page_fails_the_source() {
    let site = StaticSite::default();
    let spec = test_source(false);

    let outcome = Crawler::with_limits(&site, &spec, 100, Duration::ZERO).run();

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.report.pages_fetched, 0);
    assert_eq!(outcome.report.stop_reason, StopReason::ListPageFailed);
    assert!(!outcome.report.success());
}

#[test]
fn page_ceiling_stops_endless_pagination() {
    let site = StaticSite::default()
        .page(PAGE_1, &results_page(&["/p/1"], true))
        .page(PAGE_2, &results_page(&["/p/2"], true))
        .page(PAGE_3, &results_page(&["/p/3"], true))
        .page(&listing(1), &detail_page("1", "For Sale", "£1"))
        .page(&listing(2), &detail_page("2", "For Sale", "£2"))
        .page(&listing(3), &detail_page("3", "For Sale", "£3"));
    let spec = test_source(false);

    let outcome = Crawler::with_limits(&site, &spec, 2, Duration::ZERO).run();

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.report.stop_reason, StopReason::PageLimit);
    assert_eq!(site.fetch_count(PAGE_3), 0);
}

#[test]
fn unreadable_next_page_selector_keeps_the_page_and_stops() {
    let site = StaticSite::default()
        .page(PAGE_1, &results_page(&["/p/1"], true))
        .page(PAGE_2, &results_page(&["/p/2"], true))
        .page(&listing(1), &detail_page("1 Mill Lane", "For Sale", "£1m"))
        .page(&listing(2), &detail_page("2 Mill Lane", "For Sale", "£2m"));
    // Bypasses load-time validation.
    let mut spec = test_source(true);
    spec.next_page = Some("a[[next".into());

    let outcome = Crawler::with_limits(&site, &spec, 100, Duration::ZERO).run();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.report.stop_reason, StopReason::NoNextPage);
    assert_eq!(site.fetch_count(PAGE_2), 0);
}
