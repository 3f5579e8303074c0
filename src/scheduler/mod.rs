// SPDX-License-Identifier: GPL-3.0-only
pub mod worker;

pub use worker::Scheduler;
