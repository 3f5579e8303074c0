// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::path::Path;

use crate::store::error::MirrorError;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Mirror the asset at `source_url` into `<root_dir>/content/` and
    /// return the public URL it will be served from under `new_base_url`.
    async fn mirror(
        &self,
        source_url: &str,
        new_base_url: &str,
        root_dir: &Path,
    ) -> Result<String, MirrorError>;
}
