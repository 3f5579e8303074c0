// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One feed's catalog, in upstream document order.
pub type Catalog = Vec<CatalogEntry>;

/// One plugin's record from an upstream feed.
///
/// The mirror only reads and rewrites `image_url` and the per-version
/// `artifact` fields; everything else the upstream sends is carried
/// through untouched via the flattened map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub image_url: String,

    pub versions: Vec<VersionRecord>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Upstream content hash, used to build the artifact download URL.
    pub hash: String,

    /// Rewritten local artifact URL, filled in during mirroring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_survive_a_round_trip() {
        let upstream = serde_json::json!({
            "name": "example-plugin",
            "author": "someone",
            "image_url": "https://cdn.example/img.png",
            "tags": ["utility"],
            "versions": [
                { "name": "1.0.0", "hash": "abc123" }
            ]
        });

        let entry: CatalogEntry = serde_json::from_value(upstream).unwrap();
        assert_eq!(entry.image_url, "https://cdn.example/img.png");
        assert_eq!(entry.versions[0].hash, "abc123");
        assert_eq!(entry.versions[0].artifact, None);

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["name"], "example-plugin");
        assert_eq!(back["author"], "someone");
        assert_eq!(back["tags"][0], "utility");
        assert_eq!(back["versions"][0]["name"], "1.0.0");
    }

    #[test]
    fn test_artifact_is_omitted_until_set() {
        let mut version: VersionRecord =
            serde_json::from_value(serde_json::json!({ "hash": "abc123" })).unwrap();

        let bare = serde_json::to_value(&version).unwrap();
        assert!(bare.get("artifact").is_none());

        version.artifact = Some("https://mirror.example/stable/content/deadbeef.zip".to_string());
        let filled = serde_json::to_value(&version).unwrap();
        assert_eq!(
            filled["artifact"],
            "https://mirror.example/stable/content/deadbeef.zip"
        );
    }
}
