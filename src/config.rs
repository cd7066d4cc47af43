// config.rs
use crate::errors::{ListingsError, Result};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// Run-wide settings, read from `LISTINGS_*` environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: String,
    pub sources_path: PathBuf,
    /// Ceiling on result pages per source, for sites whose "no more pages"
    /// signal can't be trusted. A source may set a lower one.
    pub max_pages: u32,
    pub page_delay: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub xlsx_path: Option<PathBuf>,
    pub run_date: NaiveDate,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: "listings.sqlite3".to_string(),
            sources_path: PathBuf::from("sources.json"),
            max_pages: 500,
            page_delay: Duration::ZERO,
            request_timeout: Duration::from_secs(60),
            user_agent: USER_AGENT.to_string(),
            xlsx_path: None,
            run_date: Local::now().date_naive(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| ListingsError::Config(format!("{name} has an invalid value: '{raw}'")))
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from any variable lookup, falling back to defaults
    /// for unset or blank variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut settings = Settings::default();

        if let Some(v) = get("LISTINGS_DB") {
            settings.db_path = v;
        }
        if let Some(v) = get("LISTINGS_SOURCES") {
            settings.sources_path = PathBuf::from(v);
        }
        if let Some(v) = get("LISTINGS_MAX_PAGES") {
            settings.max_pages = parse_var("LISTINGS_MAX_PAGES", &v)?;
            if settings.max_pages == 0 {
                return Err(ListingsError::Config(
                    "LISTINGS_MAX_PAGES must be at least 1".into(),
                ));
            }
        }
        if let Some(v) = get("LISTINGS_PAGE_DELAY_MS") {
            settings.page_delay = Duration::from_millis(parse_var("LISTINGS_PAGE_DELAY_MS", &v)?);
        }
        if let Some(v) = get("LISTINGS_TIMEOUT_SECS") {
            settings.request_timeout =
                Duration::from_secs(parse_var("LISTINGS_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = get("LISTINGS_USER_AGENT") {
            settings.user_agent = v;
        }
        if let Some(v) = get("LISTINGS_XLSX") {
            settings.xlsx_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("LISTINGS_RUN_DATE") {
            settings.run_date = NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").map_err(|e| {
                ListingsError::Config(format!("LISTINGS_RUN_DATE '{v}' is not YYYY-MM-DD: {e}"))
            })?;
        }

        Ok(settings)
    }

    pub fn run_date_label(&self) -> String {
        self.run_date.format("%Y-%m-%d").to_string()
    }
}
