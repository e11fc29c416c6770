//! Template loading for g8gen.
//! Resolves a template argument (a local path or a `file://` URL) to the directories
//! the generator works with.
use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use url::Url;

use crate::constants::{CODE_BASE_DIR, METADATA_FILE, SCAFFOLDS_DIR};
use crate::error::{Error, Result};

/// Directories of a template checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLayout {
    /// Template root directory
    pub root: PathBuf,
    /// Code base walked during generation (`src/main/g8`)
    pub code_base: PathBuf,
    /// Optional scaffold trees (`src/main/scaffolds`)
    pub scaffolds: PathBuf,
}

impl TemplateLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let root = root.into();
        Self {
            code_base: root.join(CODE_BASE_DIR),
            scaffolds: root.join(SCAFFOLDS_DIR),
            root,
        }
    }

    /// The parameter defaults file of the code base.
    pub fn metadata_file(&self) -> PathBuf {
        self.code_base.join(METADATA_FILE)
    }

    pub fn has_scaffolds(&self) -> bool {
        self.scaffolds.is_dir()
    }
}

impl fmt::Display for TemplateLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "local path: '{}'", self.root.display())
    }
}

/// Turns a template argument into a local directory path.
///
/// # Errors
/// * `Error::TemplateDoesNotExistsError` for URLs other than `file://`
pub fn resolve_template_path(template: &str) -> Result<PathBuf> {
    match Url::parse(template) {
        Ok(url) if url.scheme() == "file" => url.to_file_path().map_err(|_| {
            Error::TemplateDoesNotExistsError { template_dir: template.to_string() }
        }),
        // Single letters are Windows drive prefixes such as `C:\templates`.
        Ok(url) if url.scheme().len() > 1 => {
            Err(Error::TemplateDoesNotExistsError { template_dir: template.to_string() })
        }
        _ => Ok(PathBuf::from(template)),
    }
}

/// Returns the layout of the template at `template`.
///
/// # Errors
/// * `Error::TemplateDoesNotExistsError` if the directory or its code base is missing
pub fn load_template(template: &str) -> Result<TemplateLayout> {
    let root = resolve_template_path(template)?;
    load_layout(&root)
}

pub fn load_layout(root: &Path) -> Result<TemplateLayout> {
    let layout = TemplateLayout::new(root);
    if !layout.code_base.is_dir() {
        return Err(Error::TemplateDoesNotExistsError {
            template_dir: root.display().to_string(),
        });
    }
    debug!("Using template code base '{}'", layout.code_base.display());
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_display() {
        let layout = TemplateLayout::new("/path/to/template");
        assert_eq!(format!("{}", layout), "local path: '/path/to/template'");
        assert_eq!(layout.code_base, PathBuf::from("/path/to/template").join("src/main/g8"));
    }

    #[test]
    fn test_resolve_template_path() {
        assert_eq!(resolve_template_path("./local/path").unwrap(), PathBuf::from("./local/path"));
        assert!(matches!(
            resolve_template_path("https://github.com/user/repo.g8"),
            Err(Error::TemplateDoesNotExistsError { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_file_url() {
        assert_eq!(
            resolve_template_path("file:///tmp/my.g8").unwrap(),
            PathBuf::from("/tmp/my.g8")
        );
    }

    #[test]
    fn test_load_template_requires_code_base() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_str().unwrap();
        assert!(load_template(root).is_err());

        std::fs::create_dir_all(temp_dir.path().join("src/main/g8")).unwrap();
        let layout = load_template(root).unwrap();
        assert!(!layout.has_scaffolds());
        assert_eq!(layout.metadata_file(), temp_dir.path().join("src/main/g8/default.properties"));
    }
}
