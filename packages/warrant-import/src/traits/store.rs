use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{Fugitive, Warrant};

/// Local record of every warrant already seen, keyed by warrant number.
///
/// This is the only authority on whether a warrant has been published.
#[async_trait]
pub trait WarrantStore: Send + Sync {
    /// Whether a warrant number has been recorded.
    async fn exists(&self, number: &str) -> StoreResult<bool>;

    /// Record a new warrant.
    ///
    /// Returns [`crate::StoreError::Duplicate`] if the number is already
    /// present. The write is durable once this returns.
    async fn insert(&self, warrant: &Warrant) -> StoreResult<()>;

    /// Record a fugitive. Already-known detail URLs are left untouched.
    async fn record_fugitive(&self, fugitive: &Fugitive) -> StoreResult<()>;

    /// Number of warrants recorded.
    async fn count(&self) -> StoreResult<usize>;
}
