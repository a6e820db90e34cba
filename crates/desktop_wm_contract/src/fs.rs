//! File-system collaborator consumed by file-browser window content.
//!
//! The window manager core never calls this interface. It lives here so window content and the
//! embedding host agree on one contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Directory entry kind.
pub enum FsEntryKind {
    /// File entry.
    File,
    /// Directory entry.
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One node of the virtual file system.
pub struct FsEntry {
    /// Entry name (last path segment).
    pub name: String,
    /// Normalized absolute path.
    pub path: String,
    /// Entry kind.
    pub kind: FsEntryKind,
    /// Text content for files; empty for directories.
    #[serde(default)]
    pub content: String,
}

/// Read-only virtual file system lookups.
pub trait FileSystemService {
    /// Lists the direct children of the directory at `path`, sorted by name.
    ///
    /// Returns `None` when `path` does not exist or is not a directory.
    fn get_contents_at_path(&self, path: &str) -> Option<Vec<FsEntry>>;

    /// Returns the entry at `path`.
    fn get_item_at_path(&self, path: &str) -> Option<FsEntry>;
}

#[derive(Debug, Clone, Copy, Default)]
/// File system with nothing in it.
pub struct NoopFileSystemService;

impl FileSystemService for NoopFileSystemService {
    fn get_contents_at_path(&self, _path: &str) -> Option<Vec<FsEntry>> {
        None
    }

    fn get_item_at_path(&self, _path: &str) -> Option<FsEntry> {
        None
    }
}

/// Normalizes a virtual path: trims, converts `\` to `/`, resolves `.`/`..`, keeps a leading `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    let mut out = String::new();
    for segment in trimmed.replace('\\', "/").split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if let Some(idx) = out.rfind('/') {
                    out.truncate(idx);
                }
            }
            _ => {
                out.push('/');
                out.push_str(segment);
            }
        }
    }

    if out.is_empty() {
        "/".to_string()
    } else {
        out
    }
}

fn parent_path(path: &str) -> Option<String> {
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(idx) => Some(path[..idx].to_string()),
        None => None,
    }
}

#[derive(Debug, Clone)]
/// In-memory file system keyed by normalized path. The root directory always exists.
pub struct MemoryFileSystem {
    entries: BTreeMap<String, FsEntry>,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            "/".to_string(),
            FsEntry {
                name: String::new(),
                path: "/".to_string(),
                kind: FsEntryKind::Directory,
                content: String::new(),
            },
        );
        Self { entries }
    }
}

impl MemoryFileSystem {
    /// Creates a directory and any missing parents.
    pub fn add_dir(&mut self, path: &str) -> &mut Self {
        let path = normalize_path(path);
        self.insert(path, FsEntryKind::Directory, String::new());
        self
    }

    /// Creates or replaces a file, creating missing parent directories.
    pub fn add_file(&mut self, path: &str, content: impl Into<String>) -> &mut Self {
        let path = normalize_path(path);
        if path != "/" {
            self.insert(path, FsEntryKind::File, content.into());
        }
        self
    }

    fn insert(&mut self, path: String, kind: FsEntryKind, content: String) {
        if let Some(parent) = parent_path(&path) {
            if !self.entries.contains_key(&parent) {
                self.insert(parent, FsEntryKind::Directory, String::new());
            }
        }
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        self.entries.insert(
            path.clone(),
            FsEntry {
                name,
                path,
                kind,
                content,
            },
        );
    }
}

impl FileSystemService for MemoryFileSystem {
    fn get_contents_at_path(&self, path: &str) -> Option<Vec<FsEntry>> {
        let path = normalize_path(path);
        let dir = self.entries.get(&path)?;
        if dir.kind != FsEntryKind::Directory {
            return None;
        }
        let mut children: Vec<FsEntry> = self
            .entries
            .values()
            .filter(|entry| parent_path(&entry.path).as_deref() == Some(path.as_str()))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Some(children)
    }

    fn get_item_at_path(&self, path: &str) -> Option<FsEntry> {
        self.entries.get(&normalize_path(path)).cloned()
    }
}
