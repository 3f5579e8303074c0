// SPDX-License-Identifier: GPL-3.0-only
pub mod guard;
pub mod orchestrator;
pub mod state;

pub use guard::UpdateGuard;
pub use orchestrator::SyncOrchestrator;
pub use state::ScheduleState;
