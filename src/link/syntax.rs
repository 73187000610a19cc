//! Link syntax classification ([[wikilinks]], [markdown](links), <bare>)

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Match the whole value as ![[target]] or ![[target|alias]]
    static ref WIKILINK_RE: Regex = Regex::new(r"^!?\[\[([^\]]+?)(?:\|([^\]]+?))?\]\]$").unwrap();

    // Match the whole value as ![alias](target)
    static ref MARKDOWN_RE: Regex = Regex::new(r"^!?\[([^\]]*)\]\(([^)]+?)\)$").unwrap();

    // Match the whole value as !<target>
    static ref BARE_ANGLE_RE: Regex = Regex::new(r"^!?<([^>]+)>$").unwrap();
}

/// The syntax a link value was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSyntax<'a> {
    /// `[[target]]` or `[[target|alias]]`
    Wikilink {
        target: &'a str,
        alias: Option<&'a str>,
    },

    /// `[text](target)`
    MarkdownLink { text: &'a str, target: &'a str },

    /// `<target>`
    BareAngle { target: &'a str },

    /// Anything else; the whole value is the target
    Plain(&'a str),
}

impl<'a> LinkSyntax<'a> {
    /// The candidate locator captured by the syntax
    pub fn target(&self) -> &'a str {
        match *self {
            LinkSyntax::Wikilink { target, .. } => target,
            LinkSyntax::MarkdownLink { target, .. } => target,
            LinkSyntax::BareAngle { target } => target,
            LinkSyntax::Plain(value) => value,
        }
    }

    /// Alias or display text, if any non-empty text was written
    pub fn display_text(&self) -> Option<&'a str> {
        let text = match *self {
            LinkSyntax::Wikilink { alias, .. } => alias,
            LinkSyntax::MarkdownLink { text, .. } => Some(text),
            _ => None,
        };
        text.filter(|t| !t.is_empty())
    }

    /// True for every syntax except `Plain`
    pub fn is_link(&self) -> bool {
        !matches!(self, LinkSyntax::Plain(_))
    }
}

/// Classify a raw value. The first matching syntax wins, in the order
/// wikilink, markdown link, bare angle link, plain. The patterns must match
/// the whole value, surrounding whitespace included.
pub fn classify(value: &str) -> LinkSyntax<'_> {
    if let Some(cap) = WIKILINK_RE.captures(value) {
        return LinkSyntax::Wikilink {
            target: cap.get(1).map_or("", |m| m.as_str().trim()),
            alias: cap.get(2).map(|m| m.as_str().trim()),
        };
    }

    if let Some(cap) = MARKDOWN_RE.captures(value) {
        return LinkSyntax::MarkdownLink {
            text: cap.get(1).map_or("", |m| m.as_str().trim()),
            target: cap.get(2).map_or("", |m| m.as_str().trim()),
        };
    }

    if let Some(cap) = BARE_ANGLE_RE.captures(value) {
        return LinkSyntax::BareAngle {
            target: cap.get(1).map_or("", |m| m.as_str().trim()),
        };
    }

    LinkSyntax::Plain(value)
}
