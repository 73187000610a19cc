//! Global configuration for sbn

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::link::DEFAULT_HOST_SCHEME;
use crate::settings::DeviceType;

/// Global sbn configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default vault path
    #[serde(default)]
    pub vault: Option<PathBuf>,

    /// Device tier whose settings are used
    #[serde(default)]
    pub device: Option<DeviceType>,

    /// Prefix of the host's "open file" links
    #[serde(default)]
    pub host_scheme: Option<String>,

    /// Probe remote banners for their content type
    #[serde(default)]
    pub probe: bool,
}

impl Config {
    /// Load config from default location (~/.config/simple-banner/config.toml)
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path();

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        Ok(config)
    }

    /// Get default config file path
    /// Checks ~/.config/simple-banner/config.toml first (XDG style),
    /// then falls back to OS-specific location
    pub fn default_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("simple-banner").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("simple-banner")
            .join("config.toml")
    }

    pub fn host_scheme(&self) -> &str {
        self.host_scheme.as_deref().unwrap_or(DEFAULT_HOST_SCHEME)
    }

    /// Create default config file at `path` if it doesn't exist
    pub fn create_default(path: &Path) -> Result<()> {
        if path.exists() {
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let default_config = r#"# sbn configuration

# Default vault path (uncomment and set your path)
# vault = "/path/to/your/vault"

# Device settings to use: desktop, tablet or phone
# device = "desktop"

# Prefix of the editor's "open file" links
# host_scheme = "obsidian://open"

# Send HEAD requests to learn whether remote banners are images or videos
# probe = false
"#;

        std::fs::write(path, default_config)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }
}
