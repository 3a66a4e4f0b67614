use async_trait::async_trait;
use url::Url;

use crate::error::FetchResult;

/// The public site being scraped.
#[async_trait]
pub trait SourceSite: Send + Sync {
    /// The search endpoint. Relative detail links are resolved against it.
    fn search_url(&self) -> &Url;

    /// Run a last-name prefix search and return the results page HTML.
    async fn search(&self, last_name: &str) -> FetchResult<String>;

    /// Fetch a detail page's HTML.
    async fn fetch_detail(&self, url: &str) -> FetchResult<String>;
}
