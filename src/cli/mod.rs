//! CLI module - command implementations and the vault they run against

pub mod commands;

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::link::LinkParser;
use crate::settings::{load_settings, DeviceSettings, DeviceType, Settings};
use crate::vault::VaultIndex;

/// An opened vault with its settings
pub struct Workspace {
    pub index: VaultIndex,
    pub settings: Settings,
    pub config: Config,
    pub device: DeviceType,
}

impl Workspace {
    pub fn open(vault_path: &Path, config: Config, device: DeviceType) -> Result<Self> {
        let index = VaultIndex::scan(vault_path)?;
        let settings = load_settings(index.root())
            .with_context(|| format!("Failed to load settings for {}", vault_path.display()))?;

        Ok(Self {
            index,
            settings,
            config,
            device,
        })
    }

    /// Parser over this vault's files
    pub fn parser(&self) -> LinkParser<'_> {
        LinkParser::new(&self.index)
            .with_host_scheme(self.config.host_scheme())
            .with_default_property(self.settings.properties.image.as_str())
    }

    pub fn device_settings(&self) -> &DeviceSettings {
        self.settings.device(self.device)
    }
}
