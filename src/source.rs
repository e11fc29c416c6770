//! Lazy traversal of a template directory.
//!
//! [`SourceTree::entries`] yields one [`SourceEntry`] per file system entry below the root,
//! reading contents only when the entry is reached. The generator and the scaffold copier
//! consume these entries, and tests can hand them a fixed `Vec` instead.

use std::fs::{self, Permissions};
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File(Vec<u8>),
    Symlink(PathBuf),
}

/// One entry below a tree root.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    /// Path relative to the root, `/` separated, no leading separator.
    pub relative_path: String,
    /// Final path component.
    pub name: String,
    pub kind: EntryKind,
    /// Permissions to carry over; `None` leaves the platform default.
    pub permissions: Option<Permissions>,
}

impl SourceEntry {
    pub fn file<S: Into<String>, C: Into<Vec<u8>>>(relative_path: S, contents: C) -> Self {
        Self::new(relative_path.into(), EntryKind::File(contents.into()))
    }

    pub fn directory<S: Into<String>>(relative_path: S) -> Self {
        Self::new(relative_path.into(), EntryKind::Directory)
    }

    fn new(relative_path: String, kind: EntryKind) -> Self {
        let name = relative_path.rsplit('/').next().unwrap_or_default().to_string();
        Self { relative_path, name, kind, permissions: None }
    }
}

/// A directory to walk, depth first.
#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
    follow_links: bool,
}

impl SourceTree {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into(), follow_links: false }
    }

    /// When set, symlinks are reported as what they point to and their contents are read
    /// through the link. Otherwise they are reported as [`EntryKind::Symlink`].
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Walks the tree. Every call starts a fresh traversal.
    pub fn entries(&self) -> impl Iterator<Item = Result<SourceEntry>> + '_ {
        WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .map(move |entry| self.read_entry(entry?))
    }

    fn read_entry(&self, entry: walkdir::DirEntry) -> Result<SourceEntry> {
        let path = entry.path();
        let read = || -> Result<SourceEntry> {
            let relative_path = relative_path(&self.root, path)?;
            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_symlink() {
                EntryKind::Symlink(fs::read_link(path)?)
            } else {
                EntryKind::File(fs::read(path)?)
            };
            let permissions = if matches!(kind, EntryKind::Symlink(_)) {
                None
            } else {
                Some(entry.metadata()?.permissions())
            };
            let mut source = SourceEntry::new(relative_path, kind);
            source.permissions = permissions;
            Ok(source)
        };
        read().map_err(|e| e.in_file(path))
    }
}

/// `path` relative to `root`, joined with `/` whatever the platform separator is.
pub fn relative_path(root: &Path, path: &Path) -> Result<String> {
    let invalid = || Error::InvalidPath { path: path.display().to_string() };
    let stripped = path.strip_prefix(root).map_err(|_| invalid())?;

    let mut parts = Vec::new();
    for component in stripped.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(invalid)?),
            Component::CurDir => {}
            _ => return Err(invalid()),
        }
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relative_path() {
        let root = Path::new("/tmp/template/src/main/g8");
        let path = root.join("a").join("b.txt");
        assert_eq!(relative_path(root, &path).unwrap(), "a/b.txt");
        assert!(relative_path(root, Path::new("/elsewhere/b.txt")).is_err());
    }

    #[test]
    fn test_entry_constructors() {
        let entry = SourceEntry::file("dir/sub/file.txt", "content");
        assert_eq!(entry.name, "file.txt");
        assert_eq!(entry.kind, EntryKind::File(b"content".to_vec()));
        assert_eq!(SourceEntry::directory("dir/sub").name, "sub");
    }

    #[test]
    fn test_walk_reads_entries_in_order() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("b")).unwrap();
        fs::write(temp_dir.path().join("a.txt"), "A").unwrap();
        fs::write(temp_dir.path().join("b").join("c.txt"), "C").unwrap();

        let tree = SourceTree::new(temp_dir.path());
        let entries: Vec<SourceEntry> = tree.entries().collect::<Result<_>>().unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.relative_path.as_str()).collect();

        assert_eq!(paths, vec!["a.txt", "b", "b/c.txt"]);
        assert_eq!(entries[0].kind, EntryKind::File(b"A".to_vec()));
        assert_eq!(entries[1].kind, EntryKind::Directory);
        assert!(entries.iter().all(|e| e.permissions.is_some()));

        // restartable
        assert_eq!(tree.entries().count(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("real.txt"), "real").unwrap();
        std::os::unix::fs::symlink("real.txt", temp_dir.path().join("link.txt")).unwrap();

        let kept: Vec<SourceEntry> =
            SourceTree::new(temp_dir.path()).entries().collect::<Result<_>>().unwrap();
        let link = kept.iter().find(|e| e.name == "link.txt").unwrap();
        assert_eq!(link.kind, EntryKind::Symlink(PathBuf::from("real.txt")));

        let followed: Vec<SourceEntry> = SourceTree::new(temp_dir.path())
            .follow_links(true)
            .entries()
            .collect::<Result<_>>()
            .unwrap();
        let link = followed.iter().find(|e| e.name == "link.txt").unwrap();
        assert_eq!(link.kind, EntryKind::File(b"real".to_vec()));
    }
}
