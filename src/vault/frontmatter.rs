//! Frontmatter parsing and rewriting (YAML at the start of a markdown file)

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Failures when rewriting a note's header
#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("frontmatter opened with '---' is never closed")]
    Unterminated,

    #[error("frontmatter is not a key/value mapping")]
    NotAMapping,

    #[error("invalid frontmatter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parsed frontmatter data
#[derive(Debug, Default, Clone)]
pub struct Frontmatter {
    /// All fields, in file order
    pub fields: Mapping,
}

impl Frontmatter {
    /// A field as text. Scalars are stringified; an unquoted `[[link]]`,
    /// which YAML reads as a nested list, is turned back into wikilink text.
    pub fn property(&self, name: &str) -> Option<String> {
        self.fields.get(name).and_then(value_as_text)
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Sequence(seq) if seq.len() == 1 => match &seq[0] {
            Value::Sequence(inner) if inner.len() == 1 => {
                value_as_text(&inner[0]).map(|s| format!("[[{}]]", s))
            }
            other => value_as_text(other),
        },
        _ => None,
    }
}

/// Header and body of a note, split at the closing `---`
struct Split<'a> {
    yaml: &'a str,
    body: &'a str,
}

fn split(content: &str) -> Result<Option<Split<'_>>, FrontmatterError> {
    let mut lines = content.split_inclusive('\n');

    // Check for opening ---
    let first = match lines.next() {
        Some(line) if line.trim() == "---" => line,
        _ => return Ok(None),
    };

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim() == "---" {
            return Ok(Some(Split {
                yaml: &content[yaml_start..offset],
                body: &content[offset + line.len()..],
            }));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unterminated)
}

fn parse_mapping(yaml: &str) -> Result<Mapping, FrontmatterError> {
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

/// Parse YAML frontmatter from markdown content
pub fn parse_frontmatter(content: &str) -> Result<Option<Frontmatter>> {
    let split = match split(content) {
        Ok(Some(split)) => split,
        // No header, or an unclosed one: treat the whole file as body
        Ok(None) | Err(FrontmatterError::Unterminated) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let fields = match parse_mapping(split.yaml) {
        Ok(fields) => fields,
        Err(FrontmatterError::NotAMapping) => return Ok(None),
        Err(e) => return Err(e).with_context(|| "Failed to parse frontmatter as YAML"),
    };

    Ok(Some(Frontmatter { fields }))
}

/// Return `content` with `property` set to `value` in its header, creating
/// the header if the note has none. The body is left untouched.
pub fn set_property(content: &str, property: &str, value: &str) -> Result<String, FrontmatterError> {
    let (mut fields, body) = match split(content)? {
        Some(split) => (parse_mapping(split.yaml)?, split.body),
        None => (Mapping::new(), content),
    };

    fields.insert(
        Value::String(property.to_string()),
        Value::String(value.to_string()),
    );

    let yaml = serde_yaml::to_string(&fields)?;
    Ok(format!("---\n{}---\n{}", yaml, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frontmatter() {
        let content = r#"---
banner: "[[images/banner.png|400x200]]"
icon: 🦀
height: 300
tags: [travel, photos]
---

# Trip

Some content
"#;

        let fm = parse_frontmatter(content).unwrap().unwrap();

        assert_eq!(fm.property("banner").as_deref(), Some("[[images/banner.png|400x200]]"));
        assert_eq!(fm.property("icon").as_deref(), Some("🦀"));
        assert_eq!(fm.property("height").as_deref(), Some("300"));
        assert_eq!(fm.property("tags"), None);
        assert_eq!(fm.property("missing"), None);
        assert_eq!(fm.fields.len(), 4);
    }

    #[test]
    fn test_unquoted_wikilink() {
        let content = "---\nbanner: [[banner.png]]\n---\n";
        let fm = parse_frontmatter(content).unwrap().unwrap();
        assert_eq!(fm.property("banner").as_deref(), Some("[[banner.png]]"));
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just a heading\n\nSome content";
        assert!(parse_frontmatter(content).unwrap().is_none());

        let unclosed = "---\nbanner: a.png\n\nbody";
        assert!(parse_frontmatter(unclosed).unwrap().is_none());
    }

    #[test]
    fn test_empty_frontmatter() {
        let fm = parse_frontmatter("---\n---\nbody").unwrap().unwrap();
        assert!(fm.fields.is_empty());
    }

    #[test]
    fn test_set_property_existing_header() {
        let content = "---\ntitle: Trip\nbanner: obsidian://open?file=a.png\n---\n\n# Trip\n";
        let updated = set_property(content, "banner", "[[a.png]]").unwrap();

        assert!(updated.ends_with("---\n\n# Trip\n"));
        let fm = parse_frontmatter(&updated).unwrap().unwrap();
        assert_eq!(fm.property("banner").as_deref(), Some("[[a.png]]"));
        assert_eq!(fm.property("title").as_deref(), Some("Trip"));
    }

    #[test]
    fn test_set_property_creates_header() {
        let updated = set_property("# Note\n", "icon", "[[star.png]]").unwrap();
        assert!(updated.starts_with("---\n"));
        assert!(updated.ends_with("---\n# Note\n"));

        let fm = parse_frontmatter(&updated).unwrap().unwrap();
        assert_eq!(fm.property("icon").as_deref(), Some("[[star.png]]"));
    }

    #[test]
    fn test_set_property_errors() {
        assert!(matches!(
            set_property("---\nbanner: a\n", "banner", "b"),
            Err(FrontmatterError::Unterminated)
        ));
        assert!(matches!(
            set_property("---\n- a\n- b\n---\n", "banner", "b"),
            Err(FrontmatterError::NotAMapping)
        ));
    }
}
