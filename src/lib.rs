pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod normalize;
pub mod reconcile;
pub mod runner;
pub mod scraper;
pub mod spreadsheets;

#[cfg(test)]
mod tests;

pub use config::Settings;
pub use errors::{ListingsError, Result};
