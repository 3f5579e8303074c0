// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory the mirrored tree is served from
    pub site_dir: PathBuf,

    /// Public base URL of the mirror (catalog URLs are rewritten under it)
    pub server_url: String,

    /// Upstream stable feed URL
    pub stable_feed_url: String,

    /// Upstream testing feed URL
    pub testing_feed_url: String,

    /// Artifact download URL template; {} is replaced by a version's hash
    pub artifact_url_template: String,

    /// Seconds between scheduled incremental updates
    pub update_interval_secs: u64,

    /// Timeout for upstream HTTP requests in seconds
    pub http_timeout_secs: u64,

    /// Operator API bind address (e.g., "127.0.0.1:8080")
    pub local_api_bind: SocketAddr,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from TOML file with environment variable overrides
    pub fn load() -> anyhow::Result<Self> {
        let config_path =
            std::env::var("MIRROR_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut config: Config = if std::path::Path::new(&config_path).exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str(&contents)?
        } else {
            Config::default()
        };

        if let Ok(val) = std::env::var("MIRROR_SITE_DIR") {
            config.site_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("MIRROR_SERVER_URL") {
            config.server_url = val;
        }
        if let Ok(val) = std::env::var("MIRROR_STABLE_FEED_URL") {
            config.stable_feed_url = val;
        }
        if let Ok(val) = std::env::var("MIRROR_TESTING_FEED_URL") {
            config.testing_feed_url = val;
        }
        if let Ok(val) = std::env::var("MIRROR_ARTIFACT_URL_TEMPLATE") {
            config.artifact_url_template = val;
        }
        if let Ok(val) = std::env::var("MIRROR_UPDATE_INTERVAL_SECS") {
            config.update_interval_secs = val.parse()?;
        }
        if let Ok(val) = std::env::var("MIRROR_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = val.parse()?;
        }
        if let Ok(val) = std::env::var("MIRROR_LOCAL_API_BIND") {
            config.local_api_bind = SocketAddr::from_str(&val)?;
        }
        if let Ok(val) = std::env::var("MIRROR_LOG_LEVEL") {
            config.log_level = val;
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_dir: PathBuf::from("site"),
            server_url: String::from("https://justtype.ru"),
            stable_feed_url: String::from("https://plugins.deckbrew.xyz/plugins"),
            testing_feed_url: String::from("https://testing.deckbrew.xyz/plugins"),
            artifact_url_template: String::from(
                "https://cdn.tzatzikiweeb.moe/file/steam-deck-homebrew/versions/{}.zip",
            ),
            update_interval_secs: 24 * 60 * 60,
            http_timeout_secs: 300,
            local_api_bind: SocketAddr::from_str("127.0.0.1:8080").unwrap(),
            log_level: String::from("info"),
        }
    }
}
