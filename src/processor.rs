//! Per-entry processing for project generation.
//! Turns one [`SourceEntry`] into a [`GeneratedFile`] and writes it out.

use std::fs::{self, Permissions};
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::{
    error::{Error, Result},
    fields::FieldMap,
    renderer::TemplateRenderer,
    source::{EntryKind, SourceEntry},
    verbatim::VerbatimMatcher,
};

/// How a file's contents were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Path and contents rendered.
    Render,
    /// Copied byte for byte under its unrendered path.
    Verbatim,
}

impl std::fmt::Display for FileAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileAction::Render => write!(f, "generating"),
            FileAction::Verbatim => write!(f, "copying"),
        }
    }
}

/// The output of processing one source entry.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub target: PathBuf,
    pub contents: Vec<u8>,
    pub permissions: Option<Permissions>,
    pub action: FileAction,
}

/// Checks that a rendered relative path stays below the target directory.
///
/// Empty segments, such as the one left by a field rendered to nothing, collapse away;
/// the path must still name something once they are gone.
pub fn is_rendered_path_valid(rendered: &str) -> bool {
    !rendered.starts_with('/')
        && !rendered.split('/').any(|part| part == "..")
        && rendered.split('/').any(|part| !part.is_empty() && part != ".")
}

/// Joins a `/` separated relative path onto `root` using platform separators.
/// Empty and `.` segments are dropped.
pub fn resolve_target_path(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Renders entries of one code base into one target directory.
pub struct Processor<'a> {
    engine: &'a dyn TemplateRenderer,
    fields: &'a FieldMap,
    verbatim: &'a VerbatimMatcher,
    target_root: &'a Path,
    metadata_file: &'a str,
}

impl<'a> Processor<'a> {
    pub fn new(
        engine: &'a dyn TemplateRenderer,
        fields: &'a FieldMap,
        verbatim: &'a VerbatimMatcher,
        target_root: &'a Path,
        metadata_file: &'a str,
    ) -> Self {
        Self { engine, fields, verbatim, target_root, metadata_file }
    }

    /// Processes one entry.
    ///
    /// # Returns
    /// * `Ok(None)` for directories and the metadata file, which are never emitted
    /// * `Ok(Some(file))` with the destination path and final contents otherwise
    ///
    /// # Errors
    /// * Any render error, wrapped with the entry's relative path
    pub fn process(&self, entry: SourceEntry) -> Result<Option<GeneratedFile>> {
        let SourceEntry { relative_path, name, kind, permissions } = entry;

        let contents = match kind {
            EntryKind::Directory => return Ok(None),
            _ if name == self.metadata_file => {
                debug!("Skipping metadata file '{}'", relative_path);
                return Ok(None);
            }
            EntryKind::File(contents) => contents,
            EntryKind::Symlink(target) => {
                // Only reachable when the tree was walked without following links.
                return Err(Error::InvalidPath { path: target.display().to_string() }
                    .in_file(relative_path));
            }
        };

        self.render_file(&relative_path, &name, contents, permissions)
            .map(Some)
            .map_err(|e| e.in_file(relative_path))
    }

    fn render_file(
        &self,
        relative_path: &str,
        name: &str,
        contents: Vec<u8>,
        permissions: Option<Permissions>,
    ) -> Result<GeneratedFile> {
        if self.verbatim.is_verbatim(relative_path, name) {
            debug!("Copying '{}' verbatim", relative_path);
            return Ok(GeneratedFile {
                target: resolve_target_path(self.target_root, relative_path),
                contents,
                permissions,
                action: FileAction::Verbatim,
            });
        }

        let rendered_path = self.engine.render_str(relative_path, self.fields)?;
        debug!("Rendered path '{}' -> '{}'", relative_path, rendered_path);
        if !is_rendered_path_valid(&rendered_path) {
            return Err(Error::InvalidPath { path: rendered_path });
        }

        Ok(GeneratedFile {
            target: resolve_target_path(self.target_root, &rendered_path),
            contents: self.engine.render(&contents, self.fields)?,
            permissions,
            action: FileAction::Render,
        })
    }
}

/// Removes a file or symlink left at `path` by an earlier run.
///
/// A read-only file is made writable first, as Windows refuses to delete it otherwise.
pub(crate) fn remove_existing(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    if metadata.is_dir() {
        return Ok(());
    }
    if !metadata.file_type().is_symlink() && metadata.permissions().readonly() {
        let mut permissions = metadata.permissions();
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        fs::set_permissions(path, permissions)?;
    }
    debug!("Replacing existing '{}'", path.display());
    fs::remove_file(path)?;
    Ok(())
}

/// Writes a generated file, creating its parent directories first.
/// A file already at the target is replaced, even when it is read-only.
pub fn write_file(file: &GeneratedFile) -> Result<()> {
    if let Some(parent) = file.target.parent() {
        fs::create_dir_all(parent)?;
    }
    remove_existing(&file.target)?;
    fs::write(&file.target, &file.contents)?;
    if let Some(permissions) = &file.permissions {
        fs::set_permissions(&file.target, permissions.clone())?;
    }
    Ok(())
}
