//! Banner module - everything rendered above a note, computed from its frontmatter

pub mod css;
mod datetime;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::link::{parse_icon, ContentProbe, DocumentContext, IconData, LinkParser, ParsedLink, Writeback};
use crate::settings::{DeviceSettings, PropertySettings};
use crate::vault::Frontmatter;

pub use css::CssVariables;
pub use datetime::{datetime_display, DatetimeDisplay};

/// Banner, icon and datetime for one note on one device
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BannerData {
    /// Note path relative to the vault
    pub document: String,

    pub image: Option<ParsedLink>,
    pub icon: Option<IconData>,
    pub datetime: Option<DatetimeDisplay>,

    /// Host links that resolved to vault files, to be rewritten as wikilinks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub writebacks: Vec<Writeback>,

    pub variables: CssVariables,
}

impl BannerData {
    /// Assemble the banner for a note. Features disabled for the device, and
    /// properties the note does not set, come out as `None`.
    pub fn from_note(
        parser: &LinkParser<'_>,
        document: &str,
        frontmatter: Option<&Frontmatter>,
        properties: &PropertySettings,
        device: &DeviceSettings,
        now: NaiveDateTime,
    ) -> Self {
        let context = DocumentContext::new(document);
        let property = |name: &str| {
            frontmatter
                .and_then(|fm| fm.property(name))
                .filter(|v| !v.trim().is_empty())
        };

        let mut writebacks = Vec::new();
        let mut variables = CssVariables::new();

        let image = match property(properties.image.as_str()) {
            Some(value) if device.banner_enabled => {
                let resolution = parser.resolve(&value, Some(&context), Some(properties.image.as_str()));
                writebacks.extend(resolution.writeback);
                Some(resolution.link)
            }
            _ => None,
        };

        let icon = match property(properties.icon.as_str()) {
            Some(value) if device.banner_enabled && device.icon_enabled => {
                let (icon, writeback) = parse_icon(parser, &value, Some(&context), &properties.icon);
                writebacks.extend(writeback);
                variables.extend(css::icon_variables(&icon));
                Some(icon)
            }
            _ => None,
        };

        let datetime = if device.banner_enabled {
            datetime_display(device, property(properties.datetime.as_str()).as_deref(), now)
        } else {
            None
        };

        if let Some(image) = &image {
            variables.extend(css::device_variables(device));
            variables.extend(css::image_variables(image));
        }

        BannerData {
            document: document.to_string(),
            image,
            icon,
            datetime,
            writebacks,
            variables,
        }
    }

    /// Fill in the content kind of the image
    pub async fn classify(mut self, probe: Option<&dyn ContentProbe>) -> Self {
        if let Some(image) = self.image.take() {
            let image = image.classify(probe).await;
            self.variables.extend(css::image_variables(&image));
            self.image = Some(image);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.icon.is_none() && self.datetime.is_none()
    }
}

/// True if two banner values point at the same image, so a change between
/// them only touches position or repeat options
pub fn same_image(parser: &LinkParser<'_>, old: Option<&str>, new: Option<&str>) -> bool {
    match (old, new) {
        (Some(old), Some(new)) if !old.is_empty() && !new.is_empty() => {
            parser.parse(old, None, None).url == parser.parse(new, None, None).url
        }
        _ => false,
    }
}
