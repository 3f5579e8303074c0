// SPDX-License-Identifier: GPL-3.0-only
pub mod catalog;
pub mod models;

pub use catalog::CatalogFetcher;
pub use models::{Catalog, CatalogEntry, VersionRecord};
