// errors.rs
use thiserror::Error;

/// Errors raised by the collaborators around the normalization core
/// (fetching, selectors, storage, configuration, export).
///
/// The normalization functions themselves never return these: text that
/// does not match resolves to an absent value instead.
#[derive(Debug, Error)]
pub enum ListingsError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid selector '{0}'")]
    Selector(String),

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Corrupt stored data: {0}")]
    CorruptRow(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error")]
    InternalError,
}

pub type Result<T> = std::result::Result<T, ListingsError>;
