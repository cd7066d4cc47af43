mod crawler_tests;
mod snapshot_store_tests;
mod utils;
