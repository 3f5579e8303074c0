// SPDX-License-Identifier: GPL-3.0-only
pub mod content;
pub mod error;
pub mod traits;

pub use content::HttpContentStore;
pub use error::MirrorError;
pub use traits::ObjectStore;
