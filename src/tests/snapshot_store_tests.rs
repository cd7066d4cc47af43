// src/tests/snapshot_store_tests.rs

use super::utils::make_db;
use crate::config::Settings;
use crate::db::{get_recent_scrapes, history_for, load_snapshot, record_scrape_run, replace_snapshot};
use crate::domain::{ListingRecord, ListingStatus, SaleType, Tenure};
use crate::errors::ListingsError;
use crate::reconcile::reconcile;
use crate::runner::{aggregate, persist_run};
use crate::scraper::{CrawlOutcome, CrawlReport, StopReason};
use chrono::{NaiveDate, Utc};

fn settings_for(day: u32) -> Settings {
    Settings {
        run_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        ..Settings::default()
    }
}

fn record(url: &str, price: i64) -> ListingRecord {
    ListingRecord {
        display_address: format!("{url} address"),
        price: Some(price),
        property_image: vec![format!("{url}/1.jpg"), format!("{url}/2.jpg")],
        size_ft: Some(1250.5),
        postal_code: Some("LS1 4DY".into()),
        tenure: Tenure::Freehold,
        sale_type: SaleType::ForSale,
        ..ListingRecord::new(url)
    }
}

fn report(source: &str) -> CrawlReport {
    let now = Utc::now().naive_utc();
    CrawlReport {
        source: source.to_string(),
        started_at: now,
        finished_at: now,
        pages_fetched: 2,
        listings: 1,
        discarded: 0,
        failed: 0,
        stop_reason: StopReason::NoNewListings,
    }
}

fn statuses(db: &crate::db::Database) -> Vec<(String, ListingStatus, String)> {
    load_snapshot(db)
        .unwrap()
        .into_iter()
        .map(|r| (r.record.listing_url, r.status, r.date))
        .collect()
}

#[test]
fn three_runs_round_trip_through_the_store() {
    let db = make_db("snapshot_round_trip");
    let a = "https://agents.example/p/a";
    let b = "https://agents.example/p/b";

    persist_run(&db, &settings_for(1), &[record(a, 300000), record(b, 150000)]).unwrap();
    assert_eq!(
        statuses(&db),
        vec![
            (a.to_string(), ListingStatus::New, "2024-03-01".to_string()),
            (b.to_string(), ListingStatus::New, "2024-03-01".to_string()),
        ]
    );

    let summary = persist_run(&db, &settings_for(2), &[record(a, 290000)]).unwrap();
    assert_eq!((summary.new, summary.old, summary.deleted), (0, 1, 1));
    assert_eq!(
        statuses(&db),
        vec![
            (a.to_string(), ListingStatus::Old, "2024-03-02".to_string()),
            (b.to_string(), ListingStatus::Deleted, "2024-03-02".to_string()),
        ]
    );

    persist_run(&db, &settings_for(3), &[record(a, 290000)]).unwrap();
    assert_eq!(
        statuses(&db),
        vec![
            (a.to_string(), ListingStatus::Old, "2024-03-03".to_string()),
            (b.to_string(), ListingStatus::Deleted, "2024-03-03".to_string()),
        ]
    );

    // Only the price drop on day two was logged.
    let history = history_for(&db, a).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].0, "2024-03-02");
    assert_eq!(history[0].1.field_name, "price");
    assert_eq!(history[0].1.previous_value, "300000");
    assert_eq!(history[0].1.current_value, "290000");
}

#[test]
fn stored_rows_keep_every_field() {
    let db = make_db("snapshot_fields");
    let original = record("https://agents.example/p/x", 425000);

    persist_run(&db, &settings_for(1), &[original.clone()]).unwrap();
    let rows = load_snapshot(&db).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record, original);
}

#[test]
fn aggregation_drops_cross_source_duplicates() {
    let url = "https://agents.example/p/shared";
    let outcomes = vec![
        CrawlOutcome {
            records: vec![record(url, 1), ListingRecord::new("")],
            report: report("first"),
        },
        CrawlOutcome {
            records: vec![record(url, 2), ListingRecord::new("")],
            report: report("second"),
        },
    ];

    let (records, reports) = aggregate(outcomes);

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].price, Some(1));
    assert_eq!(reports.len(), 2);
}

#[test]
fn scrape_runs_are_recorded() {
    let db = make_db("scrape_runs");
    record_scrape_run(&db, &report("test-agents")).unwrap();

    let runs = get_recent_scrapes(&db).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].source, "test-agents");
    assert_eq!(runs[0].stop_reason, "no_new_listings");
    assert!(runs[0].success);
}

#[test]
fn failed_snapshot_write_keeps_history_unchanged() {
    let db = make_db("snapshot_atomic");
    let a = "https://agents.example/p/a";

    persist_run(&db, &settings_for(1), &[record(a, 300000)]).unwrap();

    db.with_conn(|conn| {
        conn.execute_batch(
            "CREATE TRIGGER reject_rows BEFORE INSERT ON snapshot_rows
             BEGIN SELECT RAISE(ABORT, 'snapshot locked'); END;",
        )?;
        Ok(())
    })
    .unwrap();

    assert!(persist_run(&db, &settings_for(2), &[record(a, 290000)]).is_err());
    assert!(history_for(&db, a).unwrap().is_empty());
    assert_eq!(
        statuses(&db),
        vec![(a.to_string(), ListingStatus::New, "2024-03-01".to_string())]
    );

    db.with_conn(|conn| {
        conn.execute_batch("DROP TRIGGER reject_rows;")?;
        Ok(())
    })
    .unwrap();

    persist_run(&db, &settings_for(2), &[record(a, 290000)]).unwrap();
    assert_eq!(history_for(&db, a).unwrap().len(), 1);
}

#[test]
fn unknown_stored_status_is_reported_as_corrupt() {
    let db = make_db("snapshot_corrupt");
    replace_snapshot(&db, &reconcile(&[record("https://agents.example/p/z", 1)], &[], "2024-03-01"))
        .unwrap();

    db.with_conn(|conn| {
        conn.execute_batch(
            "PRAGMA ignore_check_constraints = ON;
             UPDATE snapshot_rows SET status = 'Archived';
             PRAGMA ignore_check_constraints = OFF;",
        )?;
        Ok(())
    })
    .unwrap();

    assert!(matches!(load_snapshot(&db), Err(ListingsError::CorruptRow(_))));
}
