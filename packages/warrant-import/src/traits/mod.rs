//! Trait seams between the importer and the outside world.
//!
//! - `SourceSite`: the sheriff's search and detail pages
//! - `WarrantStore`: the local dedup store
//! - `Publisher`: the remote dataset

pub mod publisher;
pub mod site;
pub mod store;

pub use publisher::Publisher;
pub use site::SourceSite;
pub use store::WarrantStore;
