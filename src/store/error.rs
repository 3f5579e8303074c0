// SPDX-License-Identifier: GPL-3.0-only
use thiserror::Error;

/// Errors raised while mirroring catalogs and their assets.
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Feed {url} is not a valid plugin catalog: {source}")]
    InvalidFeed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode catalog: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("An update is already in progress")]
    Busy,
}

impl MirrorError {
    /// True when the error is the single-flight guard rejecting a
    /// concurrent run rather than an actual failure.
    pub fn is_busy(&self) -> bool {
        matches!(self, MirrorError::Busy)
    }
}
