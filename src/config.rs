//! Configuration handling for g8gen templates.
//! Loads the parameter defaults file (`default.properties`) and holds the options
//! threaded through a generation run.

use std::path::Path;

use indexmap::IndexMap;
use log::debug;

use crate::constants::{DESCRIPTION_FIELD, METADATA_FILE};
use crate::error::{Error, Result};

/// Options for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Metadata file name skipped during the walk
    pub metadata_file: String,
    /// Generate into an existing target directory
    pub force: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self { metadata_file: METADATA_FILE.to_string(), force: false }
    }
}

/// Field defaults declared by a template, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateConfig {
    pub defaults: IndexMap<String, String>,
}

impl TemplateConfig {
    /// Loads a properties file. A missing file is an empty configuration.
    ///
    /// # Errors
    /// * `Error::IoError` if the file exists but cannot be read
    /// * `Error::PropertiesError` if its contents are malformed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            debug!("{} does not exist", path.display());
            return Ok(Self::default());
        }
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(Error::IoError)?;
        Self::parse(&content)
    }

    /// Parses properties text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(Self { defaults: parse_properties(content)? })
    }

    /// The documentation-only `description` entry, if present and not blank.
    pub fn description(&self) -> Option<&str> {
        self.defaults
            .get(DESCRIPTION_FIELD)
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
    }
}

/// Parses `.properties` text into ordered key/value pairs.
///
/// Supports `key=value`, `key: value` and `key value` separators, `#` and `!` comments,
/// backslash line continuations and the usual escapes including `\uXXXX`.
/// Later duplicates overwrite earlier values but keep the first position.
pub fn parse_properties(content: &str) -> Result<IndexMap<String, String>> {
    let mut properties = IndexMap::new();
    let mut lines = content.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let line_number = index + 1;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_key_value(&logical);
        let key = unescape(key, line_number)?;
        if key.is_empty() {
            continue;
        }
        properties.insert(key, unescape(value, line_number)?);
    }

    Ok(properties)
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            key_end = i;
            break;
        }
    }

    let key = &line[..key_end];
    let rest = line[key_end..].trim_start();
    let rest = match rest.chars().next() {
        Some('=') | Some(':') => rest[1..].trim_start(),
        _ => rest,
    };
    (key, rest)
}

fn unescape(value: &str, line: usize) -> Result<String> {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => result.push('\t'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('f') => result.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| Error::PropertiesError {
                        line,
                        message: format!("invalid unicode escape '\\u{hex}'"),
                    })?;
                result.push(decoded);
            }
            Some(other) => result.push(other),
            None => {}
        }
    }

    Ok(result)
}
