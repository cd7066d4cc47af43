use crate::db::connection::Database;
use crate::errors::Result;
use crate::scraper::CrawlReport;
use chrono::NaiveDateTime;
use rusqlite::params;

#[derive(Debug)]
pub struct ScrapeRun {
    pub id: i64,
    pub source: String,
    pub started_at: NaiveDateTime,
    pub finished_at: NaiveDateTime,
    pub pages_fetched: i64,
    pub listings: i64,
    pub discarded: i64,
    pub failed: i64,
    pub stop_reason: String,
    pub success: bool,
}

pub fn record_scrape_run(db: &Database, report: &CrawlReport) -> Result<i64> {
    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO scrape_runs (
                source, started_at, finished_at, pages_fetched, listings,
                discarded, failed, stop_reason, success
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                report.source,
                report.started_at,
                report.finished_at,
                report.pages_fetched as i64,
                report.listings as i64,
                report.discarded as i64,
                report.failed as i64,
                report.stop_reason.as_str(),
                report.success(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

pub fn get_recent_scrapes(db: &Database) -> Result<Vec<ScrapeRun>> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, source, started_at, finished_at, pages_fetched, listings,
                   discarded, failed, stop_reason, success
            FROM scrape_runs
            ORDER BY started_at DESC, id DESC
            LIMIT 50
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ScrapeRun {
                id: row.get(0)?,
                source: row.get(1)?,
                started_at: row.get(2)?,
                finished_at: row.get(3)?,
                pages_fetched: row.get(4)?,
                listings: row.get(5)?,
                discarded: row.get(6)?,
                failed: row.get(7)?,
                stop_reason: row.get(8)?,
                success: row.get(9)?,
            })
        })?;

        let mut runs = Vec::new();
        for r in rows {
            runs.push(r?);
        }
        Ok(runs)
    })
}
