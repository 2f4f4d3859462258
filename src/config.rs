//! Configuration types for the update watcher.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for update checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Release feed settings.
    pub feed: FeedConfig,
    /// Browser DevTools endpoint settings.
    pub browser: BrowserConfig,
}

/// Release feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// URL of the published release feed.
    pub url: String,
    /// Substring identifying the target platform's entries in the feed.
    pub platform_marker: String,
    /// Feed request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "https://ungoogled-software.github.io/ungoogled-chromium-binaries/feed.xml"
                .to_string(),
            platform_marker: "/windows/64bit/".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Browser DevTools endpoint configuration.
///
/// The browser must be started with `--remote-debugging-port` for the
/// endpoint to exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Remote-debugging host.
    pub devtools_host: String,
    /// Remote-debugging port.
    pub devtools_port: u16,
    /// DevTools HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// How long to wait for an evaluate reply before concluding the alert
    /// dialog is showing, in milliseconds. alert() blocks the evaluated
    /// script, so a displayed dialog produces no reply until dismissed.
    pub alert_grace_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            devtools_host: "127.0.0.1".to_string(),
            devtools_port: 9222,
            timeout_secs: 10,
            alert_grace_ms: 1500,
        }
    }
}

impl WatchConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::WatchError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::WatchError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/ucwatch/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("ucwatch").join("config.toml")
        } else if let Some(dir) = dirs::config_dir() {
            dir.join("ucwatch").join("config.toml")
        } else {
            PathBuf::from("/tmp/ucwatch-config/config.toml")
        }
    }
}
