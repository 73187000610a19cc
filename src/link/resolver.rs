//! Link resolution - external/host URL handling and lookup in the file index

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use super::kind::ContentKind;
use super::options::{decode_options, PropertyOptions};
use super::syntax::classify;

/// Scheme prefix of the host's "open file" deep links
pub const DEFAULT_HOST_SCHEME: &str = "obsidian://open";

/// Non-web schemes that still point outside the vault
const EXTERNAL_FILE_SCHEMES: &[&str] = &["file://"];

lazy_static! {
    static ref WEBLINK_RE: Regex = Regex::new(r"(?i)^https?://").unwrap();
}

/// A file known to the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the vault root, `/` separated
    pub path: String,

    /// File name including extension
    pub name: String,
}

impl FileEntry {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self { path, name }
    }
}

/// Lookup of files by path or name
pub trait FileIndex {
    fn find_by_path(&self, path: &str) -> Option<FileEntry>;

    fn find_by_name(&self, name: &str) -> Option<FileEntry>;

    /// Resolve `path` relative to the document at `from_path`
    fn resolve_relative(&self, path: &str, from_path: &str) -> Option<FileEntry>;

    /// Locator a renderer can load the file from
    fn resource_url_of(&self, entry: &FileEntry) -> String;
}

/// Writes a property into a document's metadata header
pub trait MetadataWriter {
    fn set_property(&self, document: &str, property: &str, value: &str) -> Result<()>;
}

/// The document a value was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    /// Document path relative to the vault root
    pub path: String,
}

impl DocumentContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Result of parsing one link value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLink {
    pub url: String,
    pub external: bool,
    pub x: i64,
    pub y: i64,
    pub repeatable: bool,

    /// Set by [`ParsedLink::classify`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ContentKind>,
}

impl ParsedLink {
    fn new(url: &str, external: bool, options: PropertyOptions) -> Self {
        Self {
            url: url.trim().to_string(),
            external,
            x: options.x,
            y: options.y,
            repeatable: options.repeatable,
            kind: None,
        }
    }

    pub fn options(&self) -> PropertyOptions {
        PropertyOptions {
            x: self.x,
            y: self.y,
            repeatable: self.repeatable,
        }
    }
}

/// Pending metadata update produced when a host URL resolved to a vault file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Writeback {
    /// Document to update
    pub document: String,

    /// Property to set
    pub property: String,

    /// Wikilink to the resolved file
    pub value: String,
}

/// A parsed link plus the write-back it calls for, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub link: ParsedLink,

    /// Vault file the value resolved to
    pub file: Option<FileEntry>,

    pub writeback: Option<Writeback>,
}

/// Parses link values against a file index
pub struct LinkParser<'a> {
    files: &'a dyn FileIndex,
    host_scheme: String,
    default_property: String,
}

impl<'a> LinkParser<'a> {
    pub fn new(files: &'a dyn FileIndex) -> Self {
        Self {
            files,
            host_scheme: DEFAULT_HOST_SCHEME.to_string(),
            default_property: "banner".to_string(),
        }
    }

    /// Use a different host deep-link scheme
    pub fn with_host_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.host_scheme = scheme.into();
        self
    }

    /// Property written back when no explicit name is given
    pub fn with_default_property(mut self, property: impl Into<String>) -> Self {
        self.default_property = property.into();
        self
    }

    /// True if the value is a host "open file" URL
    pub fn is_host_url(&self, value: &str) -> bool {
        value.starts_with(&self.host_scheme)
    }

    /// Parse a value into a link. Never fails; unresolved values pass through.
    pub fn parse(
        &self,
        raw: &str,
        context: Option<&DocumentContext>,
        writeback_property: Option<&str>,
    ) -> ParsedLink {
        self.resolve(raw, context, writeback_property).link
    }

    /// Parse a value and report the write-back it calls for without applying it
    pub fn resolve(
        &self,
        raw: &str,
        context: Option<&DocumentContext>,
        writeback_property: Option<&str>,
    ) -> Resolution {
        let syntax = classify(raw);
        let mut url = syntax.target().to_string();
        let mut display_text = syntax.display_text();
        let mut external = is_external(&url);
        let mut host_url = false;

        if self.is_host_url(&url) {
            if let Some(file) = self.host_url_file(&url) {
                url = file;
                host_url = true;
                external = false;
                display_text = None;
            }
        }

        let mut options = PropertyOptions::default();
        if external || host_url {
            if let Some((base, fragment)) = url.split_once('#') {
                options = decode_options(fragment);
                url = base.trim().to_string();
            }
        }
        if let Some(text) = display_text {
            options = decode_options(text);
        }

        let mut resolved = None;
        if !external {
            resolved = self.lookup(url.trim(), context);
            if let Some(entry) = &resolved {
                url = self.files.resource_url_of(entry);
            }
        }

        let writeback = match (host_url, &resolved, context) {
            (true, Some(entry), Some(context)) => Some(Writeback {
                document: context.path.clone(),
                property: writeback_property
                    .unwrap_or(self.default_property.as_str())
                    .to_string(),
                value: format!("[[{}]]", entry.path),
            }),
            _ => None,
        };

        Resolution {
            link: ParsedLink::new(&url, external, options),
            file: resolved,
            writeback,
        }
    }

    /// Value of the `file` query parameter of a host URL
    fn host_url_file(&self, url: &str) -> Option<String> {
        let query = url[self.host_scheme.len()..].trim_start_matches('?');
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "file")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    fn lookup(&self, locator: &str, context: Option<&DocumentContext>) -> Option<FileEntry> {
        if locator.is_empty() {
            return None;
        }

        if let Some(context) = context {
            if looks_relative(locator) {
                if let Some(entry) = self.files.resolve_relative(locator, &context.path) {
                    debug!(locator, from = %context.path, path = %entry.path, "resolved relative link");
                    return Some(entry);
                }
            }
        }

        if let Some(entry) = self.files.find_by_path(locator) {
            debug!(locator, "resolved link by path");
            return Some(entry);
        }

        let entry = self.files.find_by_name(locator);
        match &entry {
            Some(entry) => debug!(locator, path = %entry.path, "resolved link by file name"),
            None => debug!(locator, "link not found in vault"),
        }
        entry
    }
}

/// Apply a write-back produced by [`LinkParser::resolve`]
pub fn apply_resolution_writeback(writeback: &Writeback, writer: &dyn MetadataWriter) -> Result<()> {
    writer
        .set_property(&writeback.document, &writeback.property, &writeback.value)
        .with_context(|| {
            format!(
                "Failed to set '{}' on {}",
                writeback.property, writeback.document
            )
        })?;

    info!(
        document = %writeback.document,
        property = %writeback.property,
        value = %writeback.value,
        "rewrote host link as wikilink"
    );
    Ok(())
}

fn is_external(url: &str) -> bool {
    WEBLINK_RE.is_match(url)
        || EXTERNAL_FILE_SCHEMES
            .iter()
            .any(|scheme| {
                url.get(..scheme.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
            })
}

fn looks_relative(locator: &str) -> bool {
    locator.contains("./")
        || locator.contains("../")
        || (locator.contains('/') && !locator.starts_with('/'))
}
