// src/domain/snapshot.rs

use super::listing::ListingRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a listing relative to the previous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    New,
    Old,
    Deleted,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::New => "New",
            ListingStatus::Old => "Old",
            ListingStatus::Deleted => "Deleted",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "New" => Some(ListingStatus::New),
            "Old" => Some(ListingStatus::Old),
            "Deleted" => Some(ListingStatus::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a persisted snapshot: a listing plus the run date and the
/// lifecycle status assigned by reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    #[serde(flatten)]
    pub record: ListingRecord,
    /// Run date, `YYYY-MM-DD`.
    pub date: String,
    pub status: ListingStatus,
}

impl SnapshotRow {
    pub fn listing_url(&self) -> &str {
        &self.record.listing_url
    }
}
