pub mod connection;
pub mod history;
pub mod scrapes;
pub mod snapshots;

pub use connection::{init_db, Database};
pub use history::history_for;
pub use scrapes::{get_recent_scrapes, record_scrape_run, ScrapeRun};
pub use snapshots::{commit_run, load_snapshot, replace_snapshot};
