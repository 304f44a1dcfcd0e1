//! Configuration for the extractor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the yt-dlp based extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Path to the yt-dlp binary.
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
}

fn default_binary() -> PathBuf {
    PathBuf::from("yt-dlp")
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
        }
    }
}

impl ExtractorConfig {
    /// Creates a config with a custom binary path.
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractorConfig::default();
        assert_eq!(config.binary, PathBuf::from("yt-dlp"));
    }

    #[test]
    fn test_with_binary() {
        let config = ExtractorConfig::with_binary(PathBuf::from("/usr/local/bin/yt-dlp"));
        assert_eq!(config.binary, PathBuf::from("/usr/local/bin/yt-dlp"));
    }
}
