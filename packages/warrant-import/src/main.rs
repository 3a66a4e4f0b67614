// Entry point for the warrant importer

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warrant_import::{Config, HttpSourceSite, Importer, PandaPublisher, SqliteWarrantStore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,warrant_import=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Credentials are checked before any network activity
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(slug = %config.panda_slug, "Configuration loaded");

    let site = HttpSourceSite::new(&config).context("Failed to create HTTP client")?;
    let publisher = PandaPublisher::new(&config);

    tracing::info!(path = %config.database_path, "Opening warrant store");
    let store = SqliteWarrantStore::open(&config.database_path)
        .await
        .context("Failed to open warrant store")?;

    let importer = Importer::new(site, store, publisher, config.detail_prefix.clone());
    let report = importer.run().await.context("Warrant import failed")?;

    importer.into_store().close().await;

    tracing::info!(
        letters = report.letters_swept,
        urls = report.urls_discovered,
        pages = report.pages_processed,
        skipped = report.pages_skipped,
        published = report.warrants_published,
        "Done"
    );

    Ok(())
}
