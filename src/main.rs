// SPDX-License-Identifier: GPL-3.0-only
mod api;
mod config;
mod fetcher;
mod logging;
mod scheduler;
mod store;
mod sync;

use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

use api::HttpServer;
use config::Config;
use fetcher::CatalogFetcher;
use logging::setup_logging;
use scheduler::Scheduler;
use store::{HttpContentStore, ObjectStore};
use sync::SyncOrchestrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    setup_logging(&config.log_level)?;

    info!("Starting PluginMirrorDaemon v{}", env!("CARGO_PKG_VERSION"));

    let timeout = Duration::from_secs(config.http_timeout_secs);
    let object_store: Arc<dyn ObjectStore> = Arc::new(HttpContentStore::new(timeout)?);
    let catalog_fetcher = CatalogFetcher::new(object_store, timeout)?;
    let orchestrator = Arc::new(SyncOrchestrator::new(catalog_fetcher, &config));
    info!(site_dir = %config.site_dir.display(), "Mirror initialized");

    // Background scheduler: full rebuild at startup, then periodic
    // incremental updates.
    let mut scheduler = Scheduler::new(Arc::clone(&orchestrator));
    scheduler.start();

    // Operator API: status plus manual update triggers.
    let http_server = HttpServer::new(Arc::clone(&orchestrator), config.local_api_bind);
    let http_task = tokio::spawn(async move {
        if let Err(e) = http_server.serve().await {
            error!(error = %e, "Operator API server error");
        }
    });

    info!("All services started. Waiting for shutdown signal...");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal (Ctrl+C)");
        }
        Err(err) => {
            error!(error = %err, "Unable to listen for shutdown signal");
        }
    }

    info!("Initiating graceful shutdown...");

    // An in-flight update is never interrupted; stop() returns once the
    // scheduler loop has observed the flag and exited.
    scheduler.stop().await;
    http_task.abort();

    info!("Shutdown complete");
    Ok(())
}
