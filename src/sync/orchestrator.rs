// SPDX-License-Identifier: GPL-3.0-only
use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::fetcher::CatalogFetcher;
use crate::store::MirrorError;
use crate::sync::guard::{UpdateGuard, UpdatePermit};
use crate::sync::state::ScheduleState;

const STABLE_TAG: &str = "stable";
const TESTING_TAG: &str = "testing";

struct Feed {
    tag: &'static str,
    url: String,
}

/// Runs a full mirror pass over both feeds and owns the schedule state
/// and the single-flight guard.
///
/// Two entry points exist: `manual_update` refreshes the live site
/// directory in place, `hard_reset_update` rebuilds everything in a
/// staging directory and replaces the live directory wholesale on
/// success. Both are rejected with `MirrorError::Busy` while another
/// run is active.
pub struct SyncOrchestrator {
    fetcher: CatalogFetcher,
    feeds: Vec<Feed>,
    artifact_template: String,
    server_url: String,
    site_dir: PathBuf,
    guard: UpdateGuard,
    schedule: ScheduleState,
}

impl SyncOrchestrator {
    pub fn new(fetcher: CatalogFetcher, config: &Config) -> Self {
        // Feed order is fixed: stable is always processed first.
        let feeds = vec![
            Feed {
                tag: STABLE_TAG,
                url: config.stable_feed_url.clone(),
            },
            Feed {
                tag: TESTING_TAG,
                url: config.testing_feed_url.clone(),
            },
        ];

        Self {
            fetcher,
            feeds,
            artifact_template: config.artifact_url_template.clone(),
            server_url: config.server_url.trim_end_matches('/').to_string(),
            site_dir: config.site_dir.clone(),
            guard: UpdateGuard::new(),
            schedule: ScheduleState::new(Duration::seconds(config.update_interval_secs as i64)),
        }
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.schedule.last_update()
    }

    pub fn next_update(&self) -> DateTime<Utc> {
        self.schedule.next_update()
    }

    pub fn update_interval(&self) -> Duration {
        self.schedule.interval()
    }

    pub fn is_updating(&self) -> bool {
        self.guard.is_active()
    }

    /// Incremental update: mirror both feeds directly into the live
    /// site directory. Readers may observe one feed's catalog updated
    /// before the other; content files are only ever added.
    pub async fn manual_update(&self) -> Result<(), MirrorError> {
        let _permit = self.acquire()?;
        info!(target = %self.site_dir.display(), "Starting incremental update");

        self.run_update(&self.site_dir).await?;
        self.schedule.mark_completed(Utc::now());

        info!(next_update = %self.schedule.next_update(), "Incremental update complete");
        Ok(())
    }

    /// Full reset: rebuild both feeds from scratch in a private staging
    /// directory, then replace the live directory's contents with it.
    /// The staging directory is removed on every exit path.
    pub async fn hard_reset_update(&self) -> Result<(), MirrorError> {
        let _permit = self.acquire()?;

        let staging = tempfile::Builder::new()
            .prefix("mirror-build-")
            .tempdir()?;
        info!(staging = %staging.path().display(), "Starting full rebuild");

        self.run_update(staging.path()).await?;
        self.replace_live_dir(staging.path()).await?;
        self.schedule.mark_completed(Utc::now());

        info!(next_update = %self.schedule.next_update(), "Full rebuild complete");
        Ok(())
    }

    fn acquire(&self) -> Result<UpdatePermit<'_>, MirrorError> {
        self.guard.try_acquire().ok_or_else(|| {
            warn!("Update already in progress, dropping request");
            MirrorError::Busy
        })
    }

    /// Mirror both feeds into `target_root`, stable first. A failure in
    /// either feed aborts the run; the failed feed's `plugins.json` is
    /// never partially written.
    async fn run_update(&self, target_root: &Path) -> Result<(), MirrorError> {
        for feed in &self.feeds {
            let tag_dir = target_root.join(feed.tag);
            tokio::fs::create_dir_all(&tag_dir).await?;

            let base_url = format!("{}/{}", self.server_url, feed.tag);
            let catalog = self
                .fetcher
                .fetch_and_mirror(&feed.url, &self.artifact_template, &base_url, &tag_dir)
                .await?;

            let document = serde_json::to_string_pretty(&catalog)?;
            let catalog_path = tag_dir.join("plugins.json");
            tokio::fs::write(&catalog_path, document).await?;
            info!(tag = feed.tag, path = %catalog_path.display(), "Catalog written");
        }

        Ok(())
    }

    /// Delete-then-copy swap of the live directory. Not atomic: a crash
    /// between the delete and the copy leaves the live directory
    /// incomplete until the next full rebuild.
    async fn replace_live_dir(&self, staging: &Path) -> Result<(), MirrorError> {
        let live = self.site_dir.clone();
        let staging = staging.to_path_buf();

        tokio::task::spawn_blocking(move || {
            if live.exists() {
                std::fs::remove_dir_all(&live)?;
            }
            copy_dir_all(&staging, &live)
        })
        .await
        .map_err(|join_error| MirrorError::Io(std::io::Error::other(join_error)))??;

        info!(path = %self.site_dir.display(), "Live directory replaced");
        Ok(())
    }
}

fn copy_dir_all(src: &Path, dst: &Path) -> Result<(), std::io::Error> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
