//! Raw copy of scaffold trees.
//!
//! Scaffolds shipped with a template are staged unrendered under `<project>/.g8/` so that
//! `g8gen scaffold <name>` can expand them into the project later.

use std::fs::{self, Permissions};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::processor::{remove_existing, resolve_target_path};
use crate::source::{EntryKind, SourceEntry, SourceTree};

/// Copies `src_dir` into `dest_dir` without rendering anything.
///
/// Directories keep their permissions, symlinks are recreated with the same target and
/// regular files are copied byte for byte with their permissions.
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Every path created under `dest_dir`
pub fn copy_tree<P: AsRef<Path>, Q: AsRef<Path>>(src_dir: P, dest_dir: Q) -> Result<Vec<PathBuf>> {
    let dest_dir = dest_dir.as_ref();
    fs::create_dir_all(dest_dir)?;
    copy_entries(SourceTree::new(src_dir.as_ref()).entries(), dest_dir)
}

/// Copies already walked entries into `dest_dir`.
pub fn copy_entries<I>(entries: I, dest_dir: &Path) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = Result<SourceEntry>>,
{
    let mut created = Vec::new();
    // Directory permissions are applied last so read-only directories can still be filled.
    let mut directories: Vec<(PathBuf, Permissions)> = Vec::new();

    for entry in entries {
        let entry = entry?;
        let dest = resolve_target_path(dest_dir, &entry.relative_path);
        debug!("Copying '{}' -> '{}'", entry.relative_path, dest.display());

        let copied = match entry.kind {
            EntryKind::Directory => {
                fs::create_dir_all(&dest)?;
                if let Some(permissions) = entry.permissions {
                    directories.push((dest.clone(), permissions));
                }
                Ok(())
            }
            EntryKind::Symlink(target) => {
                ensure_parent(&dest)?;
                remove_existing(&dest)?;
                create_symlink(&target, &dest)
            }
            EntryKind::File(contents) => {
                ensure_parent(&dest)?;
                remove_existing(&dest)?;
                fs::write(&dest, contents)?;
                match entry.permissions {
                    Some(permissions) => fs::set_permissions(&dest, permissions),
                    None => Ok(()),
                }
            }
        };
        copied.map_err(|e| Error::from(e).in_file(&dest))?;
        created.push(dest);
    }

    for (dir, permissions) in directories.into_iter().rev() {
        fs::set_permissions(&dir, permissions)?;
    }

    Ok(created)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    let resolved = link.parent().map(|p| p.join(target)).unwrap_or_else(|| target.to_path_buf());
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}
