//! Vault module - the notes directory standing in for the host editor

mod files;
mod frontmatter;
mod writer;

pub use files::VaultIndex;
pub use frontmatter::{parse_frontmatter, Frontmatter};
pub use writer::NoteWriter;
