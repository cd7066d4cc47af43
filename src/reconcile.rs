// src/reconcile.rs
//
// Turns this run's listings plus the last persisted snapshot into the next
// snapshot. Listings seen before are Old, unseen ones New, and every row of
// the previous snapshot whose URL vanished this run is carried forward as
// Deleted. Rows that were already Deleted keep being carried forward, so the
// snapshot doubles as a deletion log.

use crate::domain::{diff_record, FieldChange, ListingRecord, ListingStatus, SnapshotRow};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub new: usize,
    pub old: usize,
    pub deleted: usize,
}

impl ReconcileSummary {
    pub fn of(rows: &[SnapshotRow]) -> Self {
        let mut summary = Self::default();
        for row in rows {
            match row.status {
                ListingStatus::New => summary.new += 1,
                ListingStatus::Old => summary.old += 1,
                ListingStatus::Deleted => summary.deleted += 1,
            }
        }
        summary
    }
}

fn keyed_urls<'a, I>(urls: I) -> HashSet<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    urls.into_iter().filter(|u| !u.trim().is_empty()).collect()
}

/// Builds the next snapshot, stamped with `date`.
///
/// Current records come first, in their original order, followed by the
/// deleted rows in the order they had in `previous`.
pub fn reconcile(
    current: &[ListingRecord],
    previous: &[SnapshotRow],
    date: &str,
) -> Vec<SnapshotRow> {
    let current_urls = keyed_urls(current.iter().map(|r| r.listing_url.as_str()));
    let previous_urls = keyed_urls(previous.iter().map(|r| r.listing_url()));

    let mut rows: Vec<SnapshotRow> = current
        .iter()
        .map(|record| SnapshotRow {
            record: record.clone(),
            date: date.to_string(),
            status: if previous_urls.contains(record.listing_url.as_str()) {
                ListingStatus::Old
            } else {
                ListingStatus::New
            },
        })
        .collect();

    let deleted_urls: HashSet<&str> = previous_urls.difference(&current_urls).copied().collect();

    rows.extend(
        previous
            .iter()
            .filter(|row| deleted_urls.contains(row.listing_url()))
            .map(|row| SnapshotRow {
                record: row.record.clone(),
                date: date.to_string(),
                status: ListingStatus::Deleted,
            }),
    );

    rows
}

/// Field-level changes for every listing present in both runs. When the
/// previous snapshot holds a URL more than once, the first row is compared.
pub fn track_changes(current: &[ListingRecord], previous: &[SnapshotRow]) -> Vec<FieldChange> {
    let mut by_url: HashMap<&str, &ListingRecord> = HashMap::new();
    for row in previous.iter().filter(|r| r.record.is_keyed()) {
        by_url.entry(row.listing_url()).or_insert(&row.record);
    }

    current
        .iter()
        .filter_map(|record| {
            by_url
                .get(record.listing_url.as_str())
                .map(|prior| diff_record(prior, record))
        })
        .flatten()
        .collect()
}
