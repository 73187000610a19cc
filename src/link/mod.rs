//! Link module - turns a frontmatter value into a resolved banner resource

mod syntax;
mod options;
mod resolver;
mod kind;
mod icon;

pub use resolver::{
    apply_resolution_writeback, DocumentContext, FileEntry, FileIndex, LinkParser, MetadataWriter,
    ParsedLink, Writeback, DEFAULT_HOST_SCHEME,
};
pub use kind::{ContentKind, ContentProbe, HttpProbe};
pub use icon::{is_icon_link, parse_icon, IconData, IconKind};
