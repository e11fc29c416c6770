//! Verbatim file handling for g8gen templates.
//! Files matching one of the `verbatim` patterns are copied byte for byte,
//! with neither their path nor their contents rendered.

use std::sync::LazyLock;

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use log::debug;
use regex::Regex;

use crate::error::{Error, Result};

static LIST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;\s]+").unwrap());

/// Splits the `verbatim` field into patterns.
pub fn parse_verbatim_list(value: &str) -> Vec<String> {
    LIST_SEPARATOR
        .split(value)
        .filter(|pattern| !pattern.is_empty())
        .map(str::to_string)
        .collect()
}

/// Patterns are written with `/`; a `\` written by a Windows user means the same thing.
fn normalize_separators(value: &str) -> String {
    value.replace('\\', "/")
}

/// Compiled verbatim patterns.
///
/// Every pattern is checked twice: against the bare file name with plain shell globbing,
/// and against the whole relative path where `*` stays within one directory and `**`
/// crosses directories. Either match makes the file verbatim.
#[derive(Debug, Clone)]
pub struct VerbatimMatcher {
    names: GlobSet,
    paths: GlobSet,
}

impl VerbatimMatcher {
    /// Compiles a list of patterns.
    ///
    /// # Errors
    /// * `Error::VerbatimPatternError` if any pattern is not a valid glob
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut names = GlobSetBuilder::new();
        let mut paths = GlobSetBuilder::new();

        for pattern in patterns {
            let pattern = normalize_separators(pattern.as_ref());
            let pattern = pattern.trim_start_matches('/');
            debug!("Adding verbatim pattern '{}'", pattern);
            names.add(Glob::new(pattern).map_err(pattern_error)?);
            paths.add(
                GlobBuilder::new(pattern)
                    .literal_separator(true)
                    .build()
                    .map_err(pattern_error)?,
            );
        }

        Ok(Self {
            names: names.build().map_err(pattern_error)?,
            paths: paths.build().map_err(pattern_error)?,
        })
    }

    /// A matcher that never matches.
    pub fn empty() -> Self {
        Self { names: GlobSet::empty(), paths: GlobSet::empty() }
    }

    /// Whether the file at `relative_path`, named `base_name`, must be copied verbatim.
    pub fn is_verbatim(&self, relative_path: &str, base_name: &str) -> bool {
        let relative_path = normalize_separators(relative_path);
        let relative_path = relative_path.trim_start_matches('/');
        self.names.is_match(base_name) || self.paths.is_match(relative_path)
    }
}

impl Default for VerbatimMatcher {
    fn default() -> Self {
        VerbatimMatcher::empty()
    }
}

fn pattern_error(e: globset::Error) -> Error {
    Error::VerbatimPatternError(e.to_string())
}

/// One-shot check without keeping the compiled matcher around.
pub fn is_verbatim<S: AsRef<str>>(
    relative_path: &str,
    base_name: &str,
    patterns: &[S],
) -> Result<bool> {
    Ok(VerbatimMatcher::new(patterns)?.is_verbatim(relative_path, base_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verbatim_list() {
        assert_eq!(
            parse_verbatim_list(" *.png,*.jpg;;assets/**\n\tbin/* "),
            vec!["*.png", "*.jpg", "assets/**", "bin/*"]
        );
        assert!(parse_verbatim_list("").is_empty());
        assert!(parse_verbatim_list(" , ; ").is_empty());
    }

    #[test]
    fn test_base_name_match_at_any_depth() {
        let matcher = VerbatimMatcher::new(&["*.png"]).unwrap();
        assert!(matcher.is_verbatim("logo.png", "logo.png"));
        assert!(matcher.is_verbatim("/assets/img/logo.png", "logo.png"));
        assert!(!matcher.is_verbatim("assets/img/logo.svg", "logo.svg"));
    }

    #[test]
    fn test_relative_path_match() {
        let matcher = VerbatimMatcher::new(&["assets/**"]).unwrap();
        assert!(matcher.is_verbatim("assets/img/logo.png", "logo.png"));
        assert!(matcher.is_verbatim("/assets/logo.png", "logo.png"));
        assert!(!matcher.is_verbatim("other/logo.png", "logo.png"));
    }

    #[test]
    fn test_single_star_stays_in_directory() {
        let matcher = VerbatimMatcher::new(&["bin/*"]).unwrap();
        assert!(matcher.is_verbatim("bin/run.sh", "run.sh"));
        assert!(!matcher.is_verbatim("bin/sub/run.sh", "run.sh"));
    }

    #[test]
    fn test_separators_are_normalized() {
        let matcher = VerbatimMatcher::new(&["assets\\**"]).unwrap();
        assert!(matcher.is_verbatim("assets/img/logo.png", "logo.png"));

        let matcher = VerbatimMatcher::new(&["assets/**"]).unwrap();
        assert!(matcher.is_verbatim("assets\\img\\logo.png", "logo.png"));
    }

    #[test]
    fn test_character_classes() {
        assert!(is_verbatim("a/file1.txt", "file1.txt", &["file[0-9].txt"]).unwrap());
        assert!(!is_verbatim("a/fileX.txt", "fileX.txt", &["file[0-9].txt"]).unwrap());
        assert!(is_verbatim("a/f.md", "f.md", &["?.md"]).unwrap());
    }

    #[test]
    fn test_empty_and_invalid_patterns() {
        let empty: [&str; 0] = [];
        assert!(!is_verbatim("a.png", "a.png", &empty).unwrap());
        assert!(!VerbatimMatcher::empty().is_verbatim("a.png", "a.png"));
        assert!(matches!(
            VerbatimMatcher::new(&["[unclosed"]),
            Err(Error::VerbatimPatternError(_))
        ));
    }
}
