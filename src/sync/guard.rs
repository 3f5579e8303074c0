// SPDX-License-Identifier: GPL-3.0-only
use std::sync::atomic::{AtomicBool, Ordering};

/// Single-flight guard over the "an update is running" flag.
///
/// Acquisition never blocks: a caller that finds the guard held is
/// rejected immediately rather than queued. The returned permit clears
/// the flag on drop, so release happens on every exit path.
pub struct UpdateGuard {
    active: AtomicBool,
}

impl UpdateGuard {
    pub fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
        }
    }

    pub fn try_acquire(&self) -> Option<UpdatePermit<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
            .then_some(UpdatePermit { guard: self })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

impl Default for UpdateGuard {
    fn default() -> Self {
        Self::new()
    }
}

pub struct UpdatePermit<'a> {
    guard: &'a UpdateGuard,
}

impl Drop for UpdatePermit<'_> {
    fn drop(&mut self) {
        self.guard.active.store(false, Ordering::Release);
    }
}
