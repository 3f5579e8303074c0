// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::store::error::MirrorError;
use crate::store::traits::ObjectStore;

/// Content-addressed store backed by plain HTTP downloads.
///
/// Every mirrored asset lands under `<root>/content/` named by the
/// SHA-256 of its bytes, so identical content collapses to one file no
/// matter how many catalog entries reference it. Files are immutable
/// once written.
pub struct HttpContentStore {
    client: Client,
}

impl HttpContentStore {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { client })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, MirrorError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| MirrorError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::Status {
                url: url.to_string(),
                status,
            });
        }

        let data = response
            .bytes()
            .await
            .map_err(|source| MirrorError::Fetch {
                url: url.to_string(),
                source,
            })?;

        Ok(data.to_vec())
    }
}

#[async_trait]
impl ObjectStore for HttpContentStore {
    async fn mirror(
        &self,
        source_url: &str,
        new_base_url: &str,
        root_dir: &Path,
    ) -> Result<String, MirrorError> {
        let (name, ext) = split_name_ext(source_url);
        let base = new_base_url.trim_end_matches('/');

        let content_dir = root_dir.join("content");
        tokio::fs::create_dir_all(&content_dir).await?;

        // Artifacts migrated before content-hashing was introduced still
        // sit under their original filename. Recognize them so they are
        // never re-downloaded.
        if ext == ".zip" {
            let legacy_path = content_dir.join(format!("{name}{ext}"));
            if legacy_path.exists() {
                debug!(path = %legacy_path.display(), "Legacy object already mirrored");
                return Ok(format!("{base}/content/{name}{ext}"));
            }
        }

        let data = self.download(source_url).await?;
        let digest = format!("{:x}", Sha256::digest(&data));

        let object_path = content_dir.join(format!("{digest}{ext}"));
        if object_path.exists() {
            debug!(path = %object_path.display(), "Object already mirrored");
        } else {
            tokio::fs::write(&object_path, &data).await?;
            info!(url = %source_url, path = %object_path.display(), "Object stored");
        }

        Ok(format!("{base}/content/{digest}{ext}"))
    }
}

/// Split the last path segment of a URL into stem and extension.
/// The extension keeps its leading dot; it is empty when the segment
/// has none.
fn split_name_ext(source_url: &str) -> (String, String) {
    let segment = Url::parse(source_url)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            source_url
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string()
        });

    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), format!(".{ext}")),
        _ => (segment, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> HttpContentStore {
        HttpContentStore::new(Duration::from_secs(5)).unwrap()
    }

    fn sha256_hex(data: &[u8]) -> String {
        format!("{:x}", Sha256::digest(data))
    }

    #[test]
    fn test_split_name_ext() {
        assert_eq!(
            split_name_ext("https://x.example/images/logo.png"),
            ("logo".to_string(), ".png".to_string())
        );
        assert_eq!(
            split_name_ext("https://x.example/images/logo.png?v=2"),
            ("logo".to_string(), ".png".to_string())
        );
        assert_eq!(
            split_name_ext("https://x.example/download"),
            ("download".to_string(), String::new())
        );
    }

    #[tokio::test]
    async fn test_mirror_stores_object_under_digest() {
        let mut server = mockito::Server::new_async().await;
        let root = TempDir::new().unwrap();

        let mock = server
            .mock("GET", "/images/logo.png")
            .with_status(200)
            .with_body("png bytes")
            .create_async()
            .await;

        let url = format!("{}/images/logo.png", server.url());
        let result = store()
            .mirror(&url, "https://mirror.example/stable", root.path())
            .await
            .unwrap();

        let digest = sha256_hex(b"png bytes");
        assert_eq!(
            result,
            format!("https://mirror.example/stable/content/{digest}.png")
        );

        let stored = root.path().join("content").join(format!("{digest}.png"));
        assert_eq!(std::fs::read(&stored).unwrap(), b"png bytes");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_mirror_is_idempotent() {
        let mut server = mockito::Server::new_async().await;
        let root = TempDir::new().unwrap();

        server
            .mock("GET", "/images/logo.png")
            .with_status(200)
            .with_body("png bytes")
            .expect(2)
            .create_async()
            .await;

        let url = format!("{}/images/logo.png", server.url());
        let store = store();
        let first = store
            .mirror(&url, "https://mirror.example/stable", root.path())
            .await
            .unwrap();
        let second = store
            .mirror(&url, "https://mirror.example/stable", root.path())
            .await
            .unwrap();

        assert_eq!(first, second);
        let files: Vec<_> = std::fs::read_dir(root.path().join("content"))
            .unwrap()
            .collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_identical_bytes_collapse_to_one_file() {
        let mut server = mockito::Server::new_async().await;
        let root = TempDir::new().unwrap();

        server
            .mock("GET", "/a/icon.bin")
            .with_status(200)
            .with_body("same bytes")
            .create_async()
            .await;
        server
            .mock("GET", "/b/icon.bin")
            .with_status(200)
            .with_body("same bytes")
            .create_async()
            .await;

        let store = store();
        let first = store
            .mirror(
                &format!("{}/a/icon.bin", server.url()),
                "https://mirror.example/stable",
                root.path(),
            )
            .await
            .unwrap();
        let second = store
            .mirror(
                &format!("{}/b/icon.bin", server.url()),
                "https://mirror.example/stable",
                root.path(),
            )
            .await
            .unwrap();

        assert_eq!(first, second);
        let files: Vec<_> = std::fs::read_dir(root.path().join("content"))
            .unwrap()
            .collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_legacy_zip_is_never_refetched() {
        let mut server = mockito::Server::new_async().await;
        let root = TempDir::new().unwrap();

        let content_dir = root.path().join("content");
        std::fs::create_dir_all(&content_dir).unwrap();
        std::fs::write(content_dir.join("abc123.zip"), "old archive").unwrap();

        let mock = server
            .mock("GET", "/versions/abc123.zip")
            .expect(0)
            .create_async()
            .await;

        let url = format!("{}/versions/abc123.zip", server.url());
        let result = store()
            .mirror(&url, "https://mirror.example/stable", root.path())
            .await
            .unwrap();

        assert_eq!(result, "https://mirror.example/stable/content/abc123.zip");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_2xx_is_a_fetch_failure() {
        let mut server = mockito::Server::new_async().await;
        let root = TempDir::new().unwrap();

        server
            .mock("GET", "/images/gone.png")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/images/gone.png", server.url());
        let result = store()
            .mirror(&url, "https://mirror.example/stable", root.path())
            .await;

        assert!(matches!(result, Err(MirrorError::Status { .. })));
        assert!(
            !root
                .path()
                .join("content")
                .read_dir()
                .map(|mut entries| entries.next().is_some())
                .unwrap_or(false)
        );
    }
}
