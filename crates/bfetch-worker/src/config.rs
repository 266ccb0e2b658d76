//! Worker configuration.

use std::path::PathBuf;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Directory holding final artifacts; created on demand
    pub download_dir: PathBuf,
    /// WebDriver endpoint for the driver-based render backend; the
    /// backend is unavailable when unset
    pub webdriver_url: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("./downloads"),
            webdriver_url: None,
        }
    }
}

impl BotConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            download_dir: std::env::var("BILIFETCH_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./downloads")),
            webdriver_url: std::env::var("BILIFETCH_WEBDRIVER_URL")
                .ok()
                .filter(|url| !url.is_empty()),
        }
    }
}
