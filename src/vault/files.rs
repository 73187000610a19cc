//! Vault file index - every attachment and note under the vault root

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tracing::warn;
use url::Url;
use walkdir::WalkDir;

use crate::link::{FileEntry, FileIndex};

/// Index of the files in a vault, keyed by vault-relative path
#[derive(Debug, Clone)]
pub struct VaultIndex {
    root: PathBuf,
    files: Vec<FileEntry>,
    by_path: HashMap<String, usize>,
}

impl VaultIndex {
    /// Walk the vault and index every file, skipping dot-directories
    /// (`.obsidian`, `.git`, `.trash`, ...)
    pub fn scan(vault_path: &Path) -> Result<Self> {
        let root = vault_path
            .canonicalize()
            .with_context(|| format!("Failed to open vault: {}", vault_path.display()))?;

        let mut paths = Vec::new();
        let walker = WalkDir::new(&root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable vault entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(relative) = relative_path(&root, entry.path()) {
                paths.push(relative);
            }
        }

        Ok(Self::from_paths(root, paths))
    }

    /// Build an index from known vault-relative paths
    pub fn from_paths(root: PathBuf, mut paths: Vec<String>) -> Self {
        paths.sort();
        paths.dedup();

        let files: Vec<FileEntry> = paths.into_iter().map(FileEntry::new).collect();
        let by_path = files
            .iter()
            .enumerate()
            .map(|(idx, f)| (f.path.clone(), idx))
            .collect();

        Self { root, files, by_path }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    #[cfg(test)]
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Markdown notes in the vault
    pub fn notes(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.iter().filter(|f| f.path.ends_with(".md"))
    }

    pub fn absolute_path(&self, entry: &FileEntry) -> PathBuf {
        self.root.join(&entry.path)
    }

    /// Vault-relative path of a note given on the command line, which may be
    /// absolute, relative to the working directory, or relative to the vault
    pub fn document_path(&self, note: &Path) -> Option<String> {
        if let Ok(absolute) = note.canonicalize() {
            if let Some(relative) = relative_path(&self.root, &absolute) {
                return Some(relative);
            }
        }

        let candidate = note.to_string_lossy().replace('\\', "/");
        self.by_path.contains_key(&candidate).then_some(candidate)
    }
}

impl FileIndex for VaultIndex {
    fn find_by_path(&self, path: &str) -> Option<FileEntry> {
        self.by_path.get(path).map(|&idx| self.files[idx].clone())
    }

    fn find_by_name(&self, name: &str) -> Option<FileEntry> {
        self.files.iter().find(|f| f.name == name).cloned()
    }

    fn resolve_relative(&self, path: &str, from_path: &str) -> Option<FileEntry> {
        let base = from_path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        let joined = normalize(&format!("{}/{}", base, path))?;
        self.find_by_path(&joined)
    }

    fn resource_url_of(&self, entry: &FileEntry) -> String {
        let absolute = self.absolute_path(entry);
        Url::from_file_path(&absolute)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| absolute.to_string_lossy().into_owned())
    }
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Collapse `.` and `..` segments; `None` if the path escapes the vault
fn normalize(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(parts.join("/"))
}
