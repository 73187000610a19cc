//! Settings type definitions

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Current shape of the settings file
pub const SETTINGS_VERSION: u32 = 2;

/// Device tier the banner is rendered for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    #[default]
    Desktop,
    Tablet,
    Phone,
}

impl DeviceType {
    pub const ALL: [DeviceType; 3] = [DeviceType::Desktop, DeviceType::Tablet, DeviceType::Phone];

    pub fn key(self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Tablet => "tablet",
            DeviceType::Phone => "phone",
        }
    }
}

/// The complete settings, one block per device tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub version: u32,

    pub desktop: DeviceSettings,
    pub tablet: DeviceSettings,
    pub phone: DeviceSettings,

    #[serde(default)]
    pub properties: PropertySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: SETTINGS_VERSION,
            desktop: DeviceSettings::default(),
            tablet: DeviceSettings {
                height: 190,
                ..DeviceSettings::default()
            },
            phone: DeviceSettings {
                height: 160,
                icon_size: 56,
                ..DeviceSettings::default()
            },
            properties: PropertySettings::default(),
        }
    }
}

impl Settings {
    pub fn device(&self, device: DeviceType) -> &DeviceSettings {
        match device {
            DeviceType::Desktop => &self.desktop,
            DeviceType::Tablet => &self.tablet,
            DeviceType::Phone => &self.phone,
        }
    }
}

/// Layout settings for one device tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceSettings {
    pub banner_enabled: bool,
    pub height: i64,
    pub note_offset: i64,
    /// Corner radii: top-left, top-right, bottom-right, bottom-left
    pub banner_radius: Vec<i64>,
    pub banner_padding: i64,
    pub banner_fade: bool,

    pub icon_enabled: bool,
    pub icon_size: i64,
    pub icon_radius: i64,
    pub icon_background: bool,
    pub icon_border: i64,
    /// Horizontal and vertical flex alignment
    pub icon_alignment: Vec<String>,
    pub icon_offset: Vec<i64>,

    pub datetime_enabled: bool,
    /// Only show a datetime when the note sets one
    pub datetime_on_prop_only: bool,
    pub datetime_alignment: Vec<String>,
    pub datetime_offset: Vec<i64>,
    /// moment.js style pattern; empty hides the time
    pub datetime_time_format: String,
    /// moment.js style pattern; empty hides the date
    pub datetime_date_format: String,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        DeviceSettings {
            banner_enabled: true,
            height: 240,
            note_offset: -32,
            banner_radius: vec![8, 8, 8, 8],
            banner_padding: 8,
            banner_fade: true,

            icon_enabled: false,
            icon_size: 96,
            icon_radius: 8,
            icon_background: true,
            icon_border: 2,
            icon_alignment: vec!["flex-start".to_string(), "flex-end".to_string()],
            icon_offset: vec![0, -24],

            datetime_enabled: false,
            datetime_on_prop_only: false,
            datetime_alignment: vec!["flex-end".to_string(), "flex-start".to_string()],
            datetime_offset: vec![0, 0],
            datetime_time_format: "HH:mm".to_string(),
            datetime_date_format: "dddd, MMMM Do YYYY".to_string(),
        }
    }
}

/// Frontmatter property names, shared by all devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertySettings {
    /// Hide the frontmatter block under the banner
    pub autohide: bool,
    pub image: String,
    pub icon: String,
    pub datetime: String,
}

impl Default for PropertySettings {
    fn default() -> Self {
        PropertySettings {
            autohide: true,
            image: "banner".to_string(),
            icon: "icon".to_string(),
            datetime: "datetime".to_string(),
        }
    }
}
