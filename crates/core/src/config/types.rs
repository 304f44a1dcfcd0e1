//! Configuration types.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::extractor::ExtractorConfig;

/// Top-level application configuration.
///
/// Every section is optional; an empty file yields a working setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "127.0.0.1".parse().unwrap()
}

fn default_port() -> u16 {
    3001
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory downloaded artifacts are written to.
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            downloads_dir: default_downloads_dir(),
        }
    }
}

fn default_downloads_dir() -> PathBuf {
    PathBuf::from("downloads")
}

/// Enrichment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Simulated analysis delay in milliseconds.
    #[serde(default = "default_analysis_delay_ms")]
    pub analysis_delay_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            analysis_delay_ms: default_analysis_delay_ms(),
        }
    }
}

fn default_analysis_delay_ms() -> u64 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 8080

[extractor]
binary = "/usr/local/bin/yt-dlp"

[storage]
downloads_dir = "/var/lib/mediagrab"

[enrichment]
analysis_delay_ms = 250
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.extractor.binary.to_str().unwrap(),
            "/usr/local/bin/yt-dlp"
        );
        assert_eq!(
            config.storage.downloads_dir.to_str().unwrap(),
            "/var/lib/mediagrab"
        );
        assert_eq!(config.enrichment.analysis_delay_ms, 250);
    }

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.extractor.binary.to_str().unwrap(), "yt-dlp");
        assert_eq!(config.storage.downloads_dir.to_str().unwrap(), "downloads");
        assert_eq!(config.enrichment.analysis_delay_ms, 2000);
    }

    #[test]
    fn test_deserialize_partial_section() {
        let toml = r#"
[server]
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        // Unset fields in a present section still default.
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_default_matches_empty_deserialization() {
        let from_empty: Config = toml::from_str("").unwrap();
        let from_default = Config::default();
        assert_eq!(from_default.server.port, from_empty.server.port);
        assert_eq!(
            from_default.storage.downloads_dir,
            from_empty.storage.downloads_dir
        );
        assert_eq!(
            from_default.enrichment.analysis_delay_ms,
            from_empty.enrichment.analysis_delay_ms
        );
    }
}
