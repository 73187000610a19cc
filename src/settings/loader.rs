//! Settings loader - reads the plugin's data.json inside the vault

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use super::migrate::migrate;
use super::{Settings, SETTINGS_VERSION};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Location of the settings file inside a vault
pub fn settings_path(vault_path: &Path) -> PathBuf {
    vault_path
        .join(".obsidian")
        .join("plugins")
        .join("simple-banner")
        .join("data.json")
}

/// Load settings, migrating old keys and saving the migrated file if any
/// key moved. A missing file gives the defaults. Defaults are filled in
/// memory only and never written back.
pub fn load_settings(vault_path: &Path) -> Result<Settings, SettingsError> {
    let path = settings_path(vault_path);

    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(&path).map_err(|source| SettingsError::Read {
        path: path.clone(),
        source,
    })?;

    let mut data: Value = serde_json::from_str(&contents).map_err(|source| SettingsError::Invalid {
        path: path.clone(),
        source,
    })?;

    let migrated = migrate(&mut data);
    if migrated {
        write_value(&path, &data)?;
        info!(path = %path.display(), "migrated settings to version {}", SETTINGS_VERSION);
    }

    // Fill whatever the file leaves out from the per-device defaults
    let mut merged = serde_json::to_value(Settings::default()).map_err(|source| {
        SettingsError::Invalid { path: path.clone(), source }
    })?;
    merge(&mut merged, data);

    serde_json::from_value(merged).map_err(|source| SettingsError::Invalid { path, source })
}

/// Write settings to the vault
pub fn save_settings(vault_path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let path = settings_path(vault_path);
    let value = serde_json::to_value(settings).map_err(|source| SettingsError::Invalid {
        path: path.clone(),
        source,
    })?;
    write_value(&path, &value)
}

fn write_value(path: &Path, value: &Value) -> Result<(), SettingsError> {
    let path = path.to_path_buf();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
            path: path.clone(),
            source,
        })?;
    }

    let contents = serde_json::to_string_pretty(value).map_err(|source| SettingsError::Invalid {
        path: path.clone(),
        source,
    })?;

    std::fs::write(&path, contents).map_err(|source| SettingsError::Write { path, source })
}

/// Recursively overlay `overlay` onto `base`; objects merge, anything else replaces
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DeviceType;
    use tempfile::tempdir;

    fn write_settings(vault: &Path, contents: &str) {
        let path = settings_path(vault);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_load_default_settings() {
        let dir = tempdir().unwrap();
        let settings = load_settings(dir.path()).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.device(DeviceType::Tablet).height, 190);
        assert_eq!(settings.device(DeviceType::Phone).icon_size, 56);
        assert!(!settings_path(dir.path()).exists());
    }

    #[test]
    fn test_partial_device_keeps_tier_defaults() {
        let dir = tempdir().unwrap();
        write_settings(
            dir.path(),
            &format!(r#"{{"version": {}, "phone": {{"iconEnabled": true}}}}"#, SETTINGS_VERSION),
        );

        let settings = load_settings(dir.path()).unwrap();
        assert!(settings.phone.icon_enabled);
        assert_eq!(settings.phone.height, 160);
        assert_eq!(settings.phone.icon_size, 56);
        assert_eq!(settings.properties.image, "banner");
    }

    #[test]
    fn test_migration_is_saved() {
        let dir = tempdir().unwrap();
        write_settings(dir.path(), r#"{"tabletHeight": 210, "padding": 4, "propertyName": "cover"}"#);

        let settings = load_settings(dir.path()).unwrap();
        assert_eq!(settings.version, SETTINGS_VERSION);
        assert_eq!(settings.tablet.height, 210);
        assert_eq!(settings.desktop.height, 240);
        assert_eq!(settings.phone.banner_padding, 4);
        assert_eq!(settings.properties.image, "cover");

        let saved = std::fs::read_to_string(settings_path(dir.path())).unwrap();
        assert!(!saved.contains("tabletHeight"));
        assert!(!saved.contains("datetimeTimeFormat"));
        assert_eq!(load_settings(dir.path()).unwrap(), settings);
    }

    #[test]
    fn test_current_file_without_version_is_left_alone() {
        let dir = tempdir().unwrap();
        let contents = r#"{"desktop":{"height":300,"datetimeEnabled":true,"datetimeTimeFormat":"HH:mm"},"tablet":{},"phone":{},"properties":{"image":"banner"}}"#;
        write_settings(dir.path(), contents);

        let settings = load_settings(dir.path()).unwrap();
        assert_eq!(settings.version, SETTINGS_VERSION);
        assert_eq!(settings.desktop.height, 300);
        assert_eq!(settings.phone.datetime_time_format, "HH:mm");

        let saved = std::fs::read_to_string(settings_path(dir.path())).unwrap();
        assert_eq!(saved, contents);
    }

    #[test]
    fn test_invalid_settings() {
        let dir = tempdir().unwrap();
        write_settings(dir.path(), "{ not json");

        assert!(matches!(load_settings(dir.path()), Err(SettingsError::Invalid { .. })));
    }
}
