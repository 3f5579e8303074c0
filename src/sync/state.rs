// SPDX-License-Identifier: GPL-3.0-only
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Timestamps of the most recent completed run and the next scheduled
/// one, stored as unix milliseconds so external readers (the status
/// endpoint, the scheduler loop) need nothing heavier than an atomic
/// load.
///
/// Both fields start at construction time and advance only when a run
/// completes successfully.
pub struct ScheduleState {
    last_update_ms: AtomicI64,
    next_update_ms: AtomicI64,
    interval: Duration,
}

impl ScheduleState {
    pub fn new(interval: Duration) -> Self {
        let now = Utc::now();
        Self {
            last_update_ms: AtomicI64::new(now.timestamp_millis()),
            next_update_ms: AtomicI64::new((now + interval).timestamp_millis()),
            interval,
        }
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        from_millis(self.last_update_ms.load(Ordering::Relaxed))
    }

    pub fn next_update(&self) -> DateTime<Utc> {
        from_millis(self.next_update_ms.load(Ordering::Relaxed))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Record a completed run: `last_update` becomes `finished_at` and
    /// `next_update` moves exactly one interval past it.
    pub fn mark_completed(&self, finished_at: DateTime<Utc>) {
        self.last_update_ms
            .store(finished_at.timestamp_millis(), Ordering::Relaxed);
        self.next_update_ms
            .store((finished_at + self.interval).timestamp_millis(), Ordering::Relaxed);
    }
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}
