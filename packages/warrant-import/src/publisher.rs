//! Publishing new warrants to the PANDA dataset.

use async_trait::async_trait;
use panda_client::{Column, ColumnSchema, DataObject, DatasetMeta, PandaClient};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::config::Config;
use crate::error::{PublishError, PublishResult};
use crate::normalize::iso_date;
use crate::traits::Publisher;
use crate::types::{Fugitive, Warrant};

/// Dataset columns, in the order rows are submitted.
pub const COLUMNS: [Column; 10] = [
    Column::new("name", "unicode", true),
    Column::new("dob", "date", false),
    Column::new("sex", "unicode", false),
    Column::new("race", "unicode", false),
    Column::new("address", "unicode", false),
    Column::new("warrant_number", "unicode", false),
    Column::new("issue_date", "date", true),
    Column::new("type", "unicode", true),
    Column::new("offense", "unicode", true),
    // Declared `float` rather than `int`: bail amounts carry cents.
    Column::new("bail_amount", "float", true),
];

/// External id for a warrant: `<number>-<name>`, with every comma in the
/// name (and the spaces around it) turned into `-`.
pub fn external_id(fugitive: &Fugitive, warrant: &Warrant) -> String {
    let name = fugitive
        .name
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("-");
    format!("{}-{}", warrant.number, name)
}

/// The composite fugitive + warrant row, aligned with [`COLUMNS`].
pub fn record_row(fugitive: &Fugitive, warrant: &Warrant) -> Vec<Option<String>> {
    vec![
        Some(fugitive.name.clone()),
        Some(iso_date(fugitive.dob)),
        Some(fugitive.sex.clone()),
        Some(fugitive.race.clone()),
        Some(fugitive.address.clone()),
        Some(warrant.number.clone()),
        Some(iso_date(warrant.issue_date)),
        Some(warrant.kind.clone()),
        Some(warrant.offense.clone()),
        warrant.bail_amount.map(|amount| amount.to_string()),
    ]
}

pub fn data_object(fugitive: &Fugitive, warrant: &Warrant) -> DataObject {
    DataObject {
        external_id: external_id(fugitive, warrant),
        data: record_row(fugitive, warrant),
    }
}

/// [`Publisher`] backed by a PANDA dataset.
pub struct PandaPublisher {
    client: PandaClient,
    slug: String,
    meta: DatasetMeta,
    schema: ColumnSchema,
}

impl PandaPublisher {
    pub fn new(config: &Config) -> Self {
        let client = PandaClient::new(
            config.panda_api_url.clone(),
            config.panda_email.clone(),
            SecretString::new(Box::from(config.panda_api_key.expose_secret())),
        );

        Self {
            client,
            slug: config.panda_slug.clone(),
            meta: DatasetMeta {
                name: "Cook County criminal warrants".to_string(),
                description: format!("Cook County criminal warrants from {}", config.search_url),
            },
            schema: ColumnSchema::new(COLUMNS),
        }
    }
}

#[async_trait]
impl Publisher for PandaPublisher {
    async fn ensure_dataset(&self) -> PublishResult<()> {
        let created = self
            .client
            .ensure_dataset(&self.slug, &self.meta, &self.schema)
            .await
            .map_err(|source| PublishError::Dataset {
                slug: self.slug.clone(),
                source,
            })?;

        if created {
            info!(slug = %self.slug, "Created PANDA dataset");
        }
        Ok(())
    }

    async fn publish(&self, object: &DataObject) -> PublishResult<()> {
        self.client
            .put_object(&self.slug, object)
            .await
            .map_err(|source| PublishError::Record {
                external_id: object.external_id.clone(),
                source,
            })
    }
}
