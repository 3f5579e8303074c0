// SPDX-License-Identifier: GPL-3.0-only
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::sync::SyncOrchestrator;

/// How often the loop checks the stop flag and the schedule. Keeps
/// shutdown latency bounded independently of the update interval.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Long-lived background loop: one full rebuild at startup, then an
/// incremental update every time the schedule comes due.
///
/// The stop flag is only observed between updates; an in-flight run
/// always completes before the loop exits.
pub struct Scheduler {
    orchestrator: Arc<SyncOrchestrator>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(orchestrator: Arc<SyncOrchestrator>) -> Self {
        Self {
            orchestrator,
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    pub fn start(&mut self) {
        if self.handle.as_ref().is_some_and(|handle| !handle.is_finished()) {
            warn!("Scheduler already running");
            return;
        }

        info!("Starting scheduler");
        self.stop.store(false, Ordering::Relaxed);

        let orchestrator = Arc::clone(&self.orchestrator);
        let stop = Arc::clone(&self.stop);
        self.handle = Some(tokio::spawn(run_loop(orchestrator, stop)));
    }

    pub async fn stop(&mut self) {
        info!("Stopping scheduler");
        self.stop.store(true, Ordering::Relaxed);

        if let Some(handle) = self.handle.take() {
            if let Err(join_error) = handle.await {
                error!(error = %join_error, "Scheduler task failed");
            }
        }
        info!("Scheduler stopped");
    }
}

async fn run_loop(orchestrator: Arc<SyncOrchestrator>, stop: Arc<AtomicBool>) {
    // Establish a known-good baseline tree before the periodic loop,
    // even when no site directory exists yet.
    match orchestrator.hard_reset_update().await {
        Ok(()) => info!("Startup full rebuild complete"),
        Err(e) if e.is_busy() => warn!("Startup full rebuild skipped, another update is active"),
        Err(e) => error!(error = %e, "Startup full rebuild failed"),
    }

    let mut next_attempt = orchestrator.next_update();

    while !stop.load(Ordering::Relaxed) {
        if Utc::now() >= next_attempt {
            match orchestrator.manual_update().await {
                Ok(()) => {
                    info!(next_update = %orchestrator.next_update(), "Scheduled update complete");
                }
                Err(e) if e.is_busy() => {
                    warn!("Scheduled update skipped, another update is active");
                }
                Err(e) => error!(error = %e, "Scheduled update failed"),
            }

            // A failed or skipped run must not hot-loop against the
            // upstream; the next attempt waits a full interval either way.
            next_attempt = orchestrator
                .next_update()
                .max(Utc::now() + orchestrator.update_interval());
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }

    info!("Scheduler loop exited");
}
