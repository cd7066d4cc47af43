// src/runner.rs

use crate::config::Settings;
use crate::db::{self, Database};
use crate::domain::ListingRecord;
use crate::errors::Result;
use crate::reconcile::{reconcile, track_changes, ReconcileSummary};
use crate::scraper::{crawl_source, CrawlOutcome, CrawlReport, HttpFetcher, SourceSpec};
use crate::spreadsheets::export_snapshot_xlsx;
use std::collections::HashSet;
use std::thread;
use tracing::{error, info, warn};

/// Crawls every source on its own thread and waits for all of them.
///
/// A source whose fetcher cannot be built, or whose thread panics, is
/// logged and contributes nothing; the others carry on.
pub fn crawl_all(settings: &Settings, sources: &[SourceSpec]) -> Vec<CrawlOutcome> {
    let handles: Vec<_> = sources
        .iter()
        .cloned()
        .map(|spec| {
            let settings = settings.clone();
            let name = spec.name.clone();
            let handle = thread::spawn(move || -> Option<CrawlOutcome> {
                match HttpFetcher::new(&settings) {
                    Ok(fetcher) => Some(crawl_source(&fetcher, &spec, &settings)),
                    Err(e) => {
                        error!(source = %spec.name, error = %e, "cannot build HTTP client");
                        None
                    }
                }
            });
            (name, handle)
        })
        .collect();

    handles
        .into_iter()
        .filter_map(|(name, handle)| match handle.join() {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(source = %name, "crawl thread panicked");
                None
            }
        })
        .collect()
}

/// Merges per-source results in source order. A URL already produced by an
/// earlier source is dropped so listing URLs stay unique within the run.
pub fn aggregate(outcomes: Vec<CrawlOutcome>) -> (Vec<ListingRecord>, Vec<CrawlReport>) {
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    let mut reports = Vec::new();

    for outcome in outcomes {
        for record in outcome.records {
            if record.is_keyed() && !seen.insert(record.listing_url.clone()) {
                warn!(
                    source = %outcome.report.source,
                    url = %record.listing_url,
                    "listing already produced by another source"
                );
                continue;
            }
            records.push(record);
        }
        reports.push(outcome.report);
    }

    (records, reports)
}

/// Reconciles this run against the stored snapshot, logs field changes and
/// overwrites the snapshot. Exports a spreadsheet when configured.
pub fn persist_run(
    db: &Database,
    settings: &Settings,
    records: &[ListingRecord],
) -> Result<ReconcileSummary> {
    let run_date = settings.run_date_label();

    let previous = db::load_snapshot(db)?;
    let rows = reconcile(records, &previous, &run_date);

    let changes = track_changes(records, &previous);
    db::commit_run(db, &rows, &changes, &run_date)?;

    if let Some(path) = &settings.xlsx_path {
        export_snapshot_xlsx(&rows, path)?;
    }

    let summary = ReconcileSummary::of(&rows);
    info!(
        date = %run_date,
        new = summary.new,
        old = summary.old,
        deleted = summary.deleted,
        changes = changes.len(),
        "snapshot updated"
    );
    Ok(summary)
}

/// One full collection cycle: crawl, record run reports, reconcile, store.
pub fn run(db: &Database, settings: &Settings, sources: &[SourceSpec]) -> Result<ReconcileSummary> {
    let outcomes = crawl_all(settings, sources);
    let (records, reports) = aggregate(outcomes);

    for report in &reports {
        if !report.success() {
            warn!(source = %report.source, "source produced nothing this run");
        }
        db::record_scrape_run(db, report)?;
    }

    persist_run(db, settings, &records)
}
