//! CSS custom property values for a rendered banner

use std::collections::BTreeMap;

use crate::link::{ContentKind, IconData, IconKind, ParsedLink};
use crate::settings::DeviceSettings;

/// Prefix of every custom property
pub const VAR_PREFIX: &str = "--sb-";

const REVERT_LAYER: &str = "revert-layer";

pub type CssVariables = BTreeMap<String, String>;

fn var(name: &str) -> String {
    format!("{}{}", VAR_PREFIX, name)
}

/// Layout variables for a device tier
pub fn device_variables(settings: &DeviceSettings) -> CssVariables {
    let radius = settings
        .banner_radius
        .iter()
        .map(|r| format!("{}px", r))
        .collect::<Vec<_>>()
        .join(" ");
    let fade = if settings.banner_fade {
        "linear-gradient(180deg, black 25%, transparent)"
    } else {
        "none"
    };

    CssVariables::from([
        (var("height"), format!("{}px", settings.height)),
        (var("note-offset"), format!("{}px", settings.note_offset)),
        (var("radius"), radius),
        (var("padding"), format!("{}px", settings.banner_padding)),
        (var("fade"), fade.to_string()),
    ])
}

/// Position, sizing and source of the banner image
pub fn image_variables(link: &ParsedLink) -> CssVariables {
    let (size, repeat) = if link.repeatable {
        ("auto", "repeat")
    } else {
        (REVERT_LAYER, REVERT_LAYER)
    };
    let url = match link.kind {
        // Videos are rendered as an element, not a background
        Some(ContentKind::Video) => "none".to_string(),
        _ => format!("url({})", link.url),
    };

    CssVariables::from([
        (var("img-x"), format!("{}px", link.x)),
        (var("img-y"), format!("{}px", link.y)),
        (var("size"), size.to_string()),
        (var("repeat"), repeat.to_string()),
        (var("url"), url),
    ])
}

/// Icon content: an image URL or a quoted text value
pub fn icon_variables(icon: &IconData) -> CssVariables {
    let value = escape(&icon.value);
    let value = match icon.kind {
        IconKind::Link => format!("url({})", value),
        IconKind::Text => format!("\"{}\"", value),
    };

    CssVariables::from([(var("icon-value"), value)])
}

/// Backslash-escape characters that break a CSS value: `# . : [ \ ] "`
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '#' | '.' | ':' | '[' | '\\' | ']' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(url: &str, x: i64, y: i64, repeatable: bool) -> ParsedLink {
        ParsedLink {
            url: url.to_string(),
            external: true,
            x,
            y,
            repeatable,
            kind: None,
        }
    }

    #[test]
    fn test_image_variables() {
        let vars = image_variables(&link("https://example.com/a.png", 10, -20, false));
        assert_eq!(vars["--sb-img-x"], "10px");
        assert_eq!(vars["--sb-img-y"], "-20px");
        assert_eq!(vars["--sb-size"], "revert-layer");
        assert_eq!(vars["--sb-repeat"], "revert-layer");
        assert_eq!(vars["--sb-url"], "url(https://example.com/a.png)");

        let vars = image_variables(&link("tile.png", 0, 0, true));
        assert_eq!(vars["--sb-size"], "auto");
        assert_eq!(vars["--sb-repeat"], "repeat");
    }

    #[test]
    fn test_video_has_no_background() {
        let mut video = link("https://example.com/clip.mp4", 0, 0, false);
        video.kind = Some(ContentKind::Video);
        assert_eq!(image_variables(&video)["--sb-url"], "none");
    }

    #[test]
    fn test_icon_variables_escape() {
        let text = IconData { kind: IconKind::Text, value: "A.B".to_string() };
        assert_eq!(icon_variables(&text)["--sb-icon-value"], "\"A\\.B\"");

        let link = IconData { kind: IconKind::Link, value: "file:///v/i.png".to_string() };
        assert_eq!(icon_variables(&link)["--sb-icon-value"], "url(file\\:///v/i\\.png)");
    }

    #[test]
    fn test_device_variables() {
        let vars = device_variables(&DeviceSettings::default());
        assert_eq!(vars["--sb-height"], "240px");
        assert_eq!(vars["--sb-radius"], "8px 8px 8px 8px");
        assert_eq!(vars["--sb-note-offset"], "-32px");
        assert!(vars["--sb-fade"].starts_with("linear-gradient"));
    }
}
