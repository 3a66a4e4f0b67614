//! Cook County Warrant Importer
//!
//! Scrapes the sheriff's wanted-persons site, keeps a local record of every
//! warrant seen, and publishes new warrants to a PANDA dataset.
//!
//! # Usage
//!
//! ```rust,ignore
//! use warrant_import::{Config, HttpSourceSite, Importer, PandaPublisher, SqliteWarrantStore};
//!
//! let config = Config::from_env()?;
//! let site = HttpSourceSite::new(&config)?;
//! let store = SqliteWarrantStore::open(&config.database_path).await?;
//! let publisher = PandaPublisher::new(&config);
//!
//! let importer = Importer::new(site, store, publisher, config.detail_prefix.clone());
//! let report = importer.run().await?;
//! ```
//!
//! # Modules
//!
//! - [`discovery`] - Alphabet sweep for detail URLs
//! - [`detail`] - Detail page and warrant table parsing
//! - [`normalize`] - Date and bail amount normalization
//! - [`stores`] - Dedup stores (SQLite, in-memory)
//! - [`publisher`] - PANDA record shape and publisher
//! - [`importer`] - The pipeline
//! - [`testing`] - Mock site and publisher

pub mod config;
pub mod detail;
pub mod discovery;
pub mod error;
pub mod importer;
pub mod layout;
pub mod normalize;
pub mod publisher;
pub mod source;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, FetchError, ImportError, ParseError, PublishError, StoreError};
pub use importer::Importer;
pub use publisher::PandaPublisher;
pub use source::HttpSourceSite;
pub use stores::{MemoryWarrantStore, SqliteWarrantStore};
pub use traits::{Publisher, SourceSite, WarrantStore};
pub use types::{DetailPage, Fugitive, ImportReport, Warrant};
