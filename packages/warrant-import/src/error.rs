//! Typed errors for the warrant importer.
//!
//! Each failure class gets its own enum so callers can tell what is fatal for
//! the whole run (config, fetch, store, publish) from what only sinks the
//! current detail page (parse). Unparseable bail amounts are not errors at all;
//! they become `None`.

use thiserror::Error;

/// Environment could not produce a usable [`crate::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{var} must be a valid number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// The source site could not be reached or answered with a non-success status.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// A detail page does not have the layout the parser expects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected} tables on detail page {url}, found {found}")]
    TableCount {
        url: String,
        expected: usize,
        found: usize,
    },

    #[error("expected {expected} rows in personal info table on {url}, found {found}")]
    PersonalRowCount {
        url: String,
        expected: usize,
        found: usize,
    },

    #[error("warrant table on {url} has {rows} rows, not a multiple of {group}")]
    WarrantRowCount {
        url: String,
        rows: usize,
        group: usize,
    },

    #[error("row {row} of the {table} table on {url} has no cells")]
    EmptyRow {
        url: String,
        table: &'static str,
        row: usize,
    },

    #[error("invalid {field} date {value:?}, expected MM/DD/YYYY")]
    InvalidDate { field: &'static str, value: String },
}

/// The dedup store rejected an operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("warrant {number} already recorded")]
    Duplicate { number: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The remote dataset could not be set up or a record could not be submitted.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to prepare dataset {slug}: {source}")]
    Dataset {
        slug: String,
        #[source]
        source: panda_client::PandaError,
    },

    #[error("failed to publish {external_id}: {source}")]
    Record {
        external_id: String,
        #[source]
        source: panda_client::PandaError,
    },
}

/// Errors that abort an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("publish error: {0}")]
    Publish(#[from] PublishError),
}

pub type Result<T> = std::result::Result<T, ImportError>;
pub type FetchResult<T> = std::result::Result<T, FetchError>;
pub type ParseResult<T> = std::result::Result<T, ParseError>;
pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type PublishResult<T> = std::result::Result<T, PublishError>;
