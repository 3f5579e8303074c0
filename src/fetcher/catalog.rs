// SPDX-License-Identifier: GPL-3.0-only
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::fetcher::models::Catalog;
use crate::store::{MirrorError, ObjectStore};

/// Downloads a feed's catalog and drives the object store to mirror
/// every asset it references, producing the rewritten catalog.
pub struct CatalogFetcher {
    client: Client,
    store: Arc<dyn ObjectStore>,
}

impl CatalogFetcher {
    pub fn new(store: Arc<dyn ObjectStore>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { client, store })
    }

    /// Fetch `feed_url`, mirror each entry's image and each version's
    /// artifact into `root_dir`, and return the catalog with all asset
    /// URLs rewritten under `new_base_url`.
    ///
    /// Entries and versions are processed strictly in document order;
    /// the first failed asset aborts the whole feed.
    pub async fn fetch_and_mirror(
        &self,
        feed_url: &str,
        artifact_template: &str,
        new_base_url: &str,
        root_dir: &Path,
    ) -> Result<Catalog, MirrorError> {
        info!(url = %feed_url, "Fetching catalog");

        let response = self
            .client
            .get(feed_url)
            .send()
            .await
            .map_err(|source| MirrorError::Fetch {
                url: feed_url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::Status {
                url: feed_url.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| MirrorError::Fetch {
                url: feed_url.to_string(),
                source,
            })?;

        let mut catalog: Catalog =
            serde_json::from_str(&body).map_err(|source| MirrorError::InvalidFeed {
                url: feed_url.to_string(),
                source,
            })?;

        for entry in &mut catalog {
            entry.image_url = self
                .store
                .mirror(&entry.image_url, new_base_url, root_dir)
                .await?;

            for version in &mut entry.versions {
                let artifact_url = artifact_template.replacen("{}", &version.hash, 1);
                let local_url = self
                    .store
                    .mirror(&artifact_url, new_base_url, root_dir)
                    .await?;
                version.artifact = Some(local_url);
            }
        }

        debug!(url = %feed_url, entries = catalog.len(), "Catalog mirrored");
        Ok(catalog)
    }
}
