use async_trait::async_trait;
use panda_client::DataObject;

use crate::error::PublishResult;

/// Destination for newly discovered warrants.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Make sure the destination dataset exists, creating it if needed.
    async fn ensure_dataset(&self) -> PublishResult<()>;

    /// Submit one record. Not retried.
    async fn publish(&self, object: &DataObject) -> PublishResult<()>;
}
