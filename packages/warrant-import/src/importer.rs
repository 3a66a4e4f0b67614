//! The import pipeline: discover, fetch, parse, dedupe, publish.

use tracing::{debug, error, info, warn};

use crate::detail::parse_detail_page;
use crate::discovery::{discover_detail_urls, ALPHABET};
use crate::error::Result;
use crate::publisher::data_object;
use crate::traits::{Publisher, SourceSite, WarrantStore};
use crate::types::{DetailPage, ImportReport};

/// Runs one import against a site, a dedup store and a publisher.
///
/// Strictly sequential: one request in flight at a time.
pub struct Importer<S, W, P> {
    site: S,
    store: W,
    publisher: P,
    detail_prefix: String,
}

impl<S, W, P> Importer<S, W, P>
where
    S: SourceSite,
    W: WarrantStore,
    P: Publisher,
{
    pub fn new(site: S, store: W, publisher: P, detail_prefix: impl Into<String>) -> Self {
        Self {
            site,
            store,
            publisher,
            detail_prefix: detail_prefix.into(),
        }
    }

    pub fn site(&self) -> &S {
        &self.site
    }

    pub fn store(&self) -> &W {
        &self.store
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Hand back the store, e.g. to close it.
    pub fn into_store(self) -> W {
        self.store
    }

    /// Run the whole pipeline once.
    ///
    /// Fetch, store and publish failures abort the run. A detail page with an
    /// unexpected layout is logged and skipped.
    pub async fn run(&self) -> Result<ImportReport> {
        self.publisher.ensure_dataset().await?;

        let urls = discover_detail_urls(&self.site, &self.detail_prefix).await?;
        let mut report = ImportReport {
            letters_swept: ALPHABET.count(),
            urls_discovered: urls.len(),
            ..Default::default()
        };
        if urls.is_empty() {
            warn!("No detail pages found; the search results layout may have changed");
        }
        info!(urls = urls.len(), "Discovered detail pages");

        for url in urls.urls() {
            debug!(url = %url, sightings = urls.count(url), "Processing detail page");
            let html = self.site.fetch_detail(url).await?;

            let page = match parse_detail_page(&html, url) {
                Ok(page) => page,
                Err(e) => {
                    warn!(url = %url, error = %e, "Skipping detail page");
                    report.pages_skipped += 1;
                    continue;
                }
            };

            report.pages_processed += 1;
            report.warrants_seen += page.warrants.len();
            report.warrants_published += self.update_warrants(&page).await?;
        }

        info!(
            pages = report.pages_processed,
            skipped = report.pages_skipped,
            warrants = report.warrants_seen,
            published = report.warrants_published,
            "Import complete"
        );
        Ok(report)
    }

    /// Record and publish every warrant on the page not already in the store.
    ///
    /// Each warrant is committed locally before it is published, so a failed
    /// publish leaves it marked as seen without reaching the remote dataset.
    async fn update_warrants(&self, page: &DetailPage) -> Result<usize> {
        let fugitive = &page.fugitive;
        self.store.record_fugitive(fugitive).await?;

        let mut published = 0;
        for warrant in &page.warrants {
            if self.store.exists(&warrant.number).await? {
                continue;
            }

            self.store.insert(warrant).await?;

            info!(
                name = %fugitive.name,
                dob = %fugitive.dob,
                number = %warrant.number,
                issue_date = %warrant.issue_date,
                kind = %warrant.kind,
                offense = %warrant.offense,
                bail_amount = ?warrant.bail_amount,
                "New warrant"
            );

            let object = data_object(fugitive, warrant);
            if let Err(e) = self.publisher.publish(&object).await {
                error!(
                    external_id = %object.external_id,
                    error = %e,
                    "Publish failed; warrant is recorded locally but not remotely"
                );
                return Err(e.into());
            }
            published += 1;
        }

        Ok(published)
    }
}
