//! Metadata writer that edits note headers on disk

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::frontmatter::set_property;
use crate::link::MetadataWriter;

/// Writes properties into the frontmatter of notes under a vault root
#[derive(Debug, Clone)]
pub struct NoteWriter {
    root: PathBuf,
}

impl NoteWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MetadataWriter for NoteWriter {
    fn set_property(&self, document: &str, property: &str, value: &str) -> Result<()> {
        let path = self.root.join(document);

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read note: {}", path.display()))?;

        let updated = set_property(&content, property, value)
            .with_context(|| format!("Failed to update frontmatter: {}", path.display()))?;

        std::fs::write(&path, updated)
            .with_context(|| format!("Failed to write note: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::parse_frontmatter;
    use tempfile::tempdir;

    #[test]
    fn test_writes_property() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("note.md"),
            "---\nbanner: obsidian://open?file=a.png\n---\nBody\n",
        )
        .unwrap();

        let writer = NoteWriter::new(dir.path());
        writer.set_property("note.md", "banner", "[[a.png]]").unwrap();

        let content = std::fs::read_to_string(dir.path().join("note.md")).unwrap();
        let fm = parse_frontmatter(&content).unwrap().unwrap();
        assert_eq!(fm.property("banner").as_deref(), Some("[[a.png]]"));
        assert!(content.ends_with("Body\n"));
    }

    #[test]
    fn test_applies_icon_writeback() {
        use crate::link::{apply_resolution_writeback, parse_icon, DocumentContext, LinkParser};
        use crate::vault::VaultIndex;

        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("icons")).unwrap();
        std::fs::write(dir.path().join("icons/star.png"), "").unwrap();
        std::fs::write(
            dir.path().join("note.md"),
            "---\nicon: obsidian://open?file=icons%2Fstar.png\n---\n",
        )
        .unwrap();

        let index = VaultIndex::scan(dir.path()).unwrap();
        let parser = LinkParser::new(&index);
        let context = DocumentContext::new("note.md");
        let (_, writeback) = parse_icon(
            &parser,
            "obsidian://open?file=icons%2Fstar.png",
            Some(&context),
            "icon",
        );

        let writer = NoteWriter::new(index.root());
        apply_resolution_writeback(&writeback.unwrap(), &writer).unwrap();

        let content = std::fs::read_to_string(dir.path().join("note.md")).unwrap();
        let fm = parse_frontmatter(&content).unwrap().unwrap();
        assert_eq!(fm.property("icon").as_deref(), Some("[[icons/star.png]]"));
    }

    #[test]
    fn test_missing_note() {
        let dir = tempdir().unwrap();
        let writer = NoteWriter::new(dir.path());
        assert!(writer.set_property("missing.md", "banner", "x").is_err());
    }
}
