mod export_xlsx;

pub use export_xlsx::{export_snapshot_xlsx, snapshot_xlsx_bytes};
