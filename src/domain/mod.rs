pub mod changes;
pub mod listing;
pub mod snapshot;

pub use changes::{diff_record, FieldChange};
pub use listing::{ListingRecord, SaleType, Tenure};
pub use snapshot::{ListingStatus, SnapshotRow};
