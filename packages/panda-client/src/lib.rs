//! Pure PANDA REST API client.
//!
//! A minimal client for the PANDA newsroom data library API. Supports probing
//! and creating datasets and upserting rows into them. Every call authenticates
//! with `email` and `api_key` query parameters.
//!
//! # Example
//!
//! ```rust,ignore
//! use panda_client::{DataObject, PandaClient};
//!
//! let client = PandaClient::new("http://panda.example.com/api/1.0", "me@example.com", key);
//!
//! if !client.dataset_exists("my_dataset").await? {
//!     client.create_dataset("my_dataset", &meta, &schema).await?;
//! }
//! client.put_object("my_dataset", &DataObject { external_id, data }).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{PandaError, Result};
pub use types::{Column, ColumnSchema, DataObject, DataUpload, DatasetMeta};

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

pub struct PandaClient {
    client: reqwest::Client,
    api_root: String,
    email: String,
    api_key: SecretString,
}

impl PandaClient {
    pub fn new(api_root: impl Into<String>, email: impl Into<String>, api_key: SecretString) -> Self {
        Self::with_client(reqwest::Client::new(), api_root, email, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        api_root: impl Into<String>,
        email: impl Into<String>,
        api_key: SecretString,
    ) -> Self {
        Self {
            client,
            api_root: api_root.into().trim_end_matches('/').to_string(),
            email: email.into(),
            api_key,
        }
    }

    fn dataset_url(&self, slug: &str) -> String {
        format!("{}/dataset/{}/", self.api_root, slug)
    }

    fn data_url(&self, slug: &str) -> String {
        format!("{}/dataset/{}/data/", self.api_root, slug)
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [
            ("email", self.email.as_str()),
            ("api_key", self.api_key.expose_secret()),
        ]
    }

    /// Probe a dataset. A 404 means it does not exist; any other non-success is an error.
    pub async fn dataset_exists(&self, slug: &str) -> Result<bool> {
        let resp = self
            .client
            .get(self.dataset_url(slug))
            .query(&self.auth())
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PandaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(true)
    }

    /// Create a dataset with the given metadata and column schema.
    pub async fn create_dataset(
        &self,
        slug: &str,
        meta: &DatasetMeta,
        schema: &ColumnSchema,
    ) -> Result<()> {
        tracing::info!(slug, columns = schema.len(), "Creating PANDA dataset");

        let resp = self
            .client
            .put(self.dataset_url(slug))
            .query(&self.auth())
            .query(&schema.query_params())
            .json(meta)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PandaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(())
    }

    /// Create the dataset unless it already exists. Returns `true` if it was created.
    pub async fn ensure_dataset(
        &self,
        slug: &str,
        meta: &DatasetMeta,
        schema: &ColumnSchema,
    ) -> Result<bool> {
        if self.dataset_exists(slug).await? {
            tracing::debug!(slug, "PANDA dataset already exists");
            return Ok(false);
        }
        self.create_dataset(slug, meta, schema).await?;
        Ok(true)
    }

    /// Upsert a single row, keyed by its external id.
    pub async fn put_object(&self, slug: &str, object: &DataObject) -> Result<()> {
        let objects = std::slice::from_ref(object);
        let resp = self
            .client
            .put(self.data_url(slug))
            .query(&self.auth())
            .json(&DataUpload { objects })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PandaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        tracing::debug!(slug, external_id = %object.external_id, "Row upserted");
        Ok(())
    }
}
