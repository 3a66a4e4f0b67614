//! HTTP access to the sheriff's site.

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::{FetchError, FetchResult};
use crate::traits::SourceSite;

const USER_AGENT: &str = concat!("warrant-import/", env!("CARGO_PKG_VERSION"));

/// [`SourceSite`] over plain HTTP.
///
/// One request at a time; non-success statuses are errors.
pub struct HttpSourceSite {
    client: reqwest::Client,
    search_url: Url,
}

impl HttpSourceSite {
    pub fn new(config: &Config) -> FetchResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|source| FetchError::Request {
                url: config.search_url.to_string(),
                source,
            })?;

        Ok(Self::with_client(client, config.search_url.clone()))
    }

    /// Set a custom HTTP client.
    pub fn with_client(client: reqwest::Client, search_url: Url) -> Self {
        Self { client, search_url }
    }

    async fn read_body(url: &str, response: reqwest::Response) -> FetchResult<String> {
        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Source site returned an error");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl SourceSite for HttpSourceSite {
    fn search_url(&self) -> &Url {
        &self.search_url
    }

    async fn search(&self, last_name: &str) -> FetchResult<String> {
        let url = self.search_url.as_str();
        debug!(url = %url, last_name, "Searching");

        let response = self
            .client
            .post(self.search_url.clone())
            .form(&[("LastName", last_name)])
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        Self::read_body(url, response).await
    }

    async fn fetch_detail(&self, url: &str) -> FetchResult<String> {
        debug!(url = %url, "Fetching detail page");
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        Self::read_body(url, response).await
    }
}
