//! Icon values - either a link to an image or literal text (emoji, initials)

use serde::Serialize;

use super::resolver::{DocumentContext, LinkParser, Resolution, Writeback};
use super::syntax::classify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Link,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconData {
    pub kind: IconKind,
    pub value: String,
}

/// Parse an icon value. Link-shaped values are resolved like banner links
/// with `property` as the write-back target; anything else is text.
pub fn parse_icon(
    parser: &LinkParser<'_>,
    raw: &str,
    context: Option<&DocumentContext>,
    property: &str,
) -> (IconData, Option<Writeback>) {
    if !is_icon_link(parser, raw) {
        let icon = IconData {
            kind: IconKind::Text,
            value: raw.to_string(),
        };
        return (icon, None);
    }

    let Resolution { link, writeback, .. } = parser.resolve(raw, context, Some(property));
    let icon = IconData {
        kind: IconKind::Link,
        value: link.url,
    };
    (icon, writeback)
}

/// True if an icon value should be resolved as a link rather than shown as text
pub fn is_icon_link(parser: &LinkParser<'_>, value: &str) -> bool {
    let lower = value.to_ascii_lowercase();

    classify(value).is_link()
        || lower.starts_with("http://")
        || lower.starts_with("https://")
        || parser.is_host_url(value)
}
