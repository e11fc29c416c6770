//! Named string filters applied inside placeholders.
//!
//! A placeholder such as `$name__upper$` or `$name;format="normalize,lower"$` pipes the
//! field value through one or more filters, left to right. Every filter is a plain
//! `fn(&str) -> String`; the registry maps the names template authors write to them.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// A single string transformation.
pub type Filter = fn(&str) -> String;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SNAKE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.\s]").unwrap());

/// Built-in filters, including their aliases.
const BUILTIN_FILTERS: [(&str, Filter); 21] = [
    ("upper", upper),
    ("uppercase", upper),
    ("lower", lower),
    ("lowercase", lower),
    ("cap", capitalize),
    ("capitalize", capitalize),
    ("start", start),
    ("word", word),
    ("word-only", word),
    ("Camel", camel),
    ("camel", camel_lower),
    ("hyphen", hyphenate),
    ("hyphenate", hyphenate),
    ("normalize", normalize),
    ("norm", normalize),
    ("snake", snake),
    ("snake-case", snake),
    ("packaged", packaged),
    ("packaged-case", packaged),
    ("random", random),
    ("generate-random", random),
];

/// Table of filters available to templates.
///
/// The registry is an ordinary value owned by the template engine, so tests and callers
/// can build one with extra filters without touching any global state.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    filters: HashMap<String, Filter>,
}

impl FilterRegistry {
    /// Creates a registry holding the built-in filters.
    pub fn new() -> Self {
        let filters = BUILTIN_FILTERS
            .iter()
            .map(|(name, filter)| (name.to_string(), *filter))
            .collect();
        Self { filters }
    }

    /// Creates a registry with no filters at all.
    pub fn empty() -> Self {
        Self { filters: HashMap::new() }
    }

    /// Adds or replaces a filter.
    pub fn register<S: Into<String>>(&mut self, name: S, filter: Filter) {
        self.filters.insert(name.into(), filter);
    }

    /// Returns the filter registered under `name`.
    ///
    /// # Errors
    /// * `Error::UnknownFilter` if no filter has that name
    pub fn lookup(&self, name: &str) -> Result<Filter> {
        self.filters
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownFilter { name: name.to_string() })
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        FilterRegistry::new()
    }
}

pub fn upper(value: &str) -> String {
    value.to_uppercase()
}

pub fn lower(value: &str) -> String {
    value.to_lowercase()
}

/// Uppercases the first character only.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercases the first character only.
pub fn decapitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalizes every space separated word.
pub fn start(value: &str) -> String {
    value.split(' ').map(capitalize).collect::<Vec<_>>().join(" ")
}

/// Removes every character outside `[A-Za-z0-9_]`.
pub fn word(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_').collect()
}

/// PascalCase: `start` then `word`.
pub fn camel(value: &str) -> String {
    word(&start(value))
}

/// camelCase: `Camel` then lowercase the first character.
pub fn camel_lower(value: &str) -> String {
    decapitalize(&camel(value))
}

pub fn hyphenate(value: &str) -> String {
    WHITESPACE_RUN.replace_all(value, "-").into_owned()
}

/// `hyphenate` then `lower`; also used for the target directory name.
pub fn normalize(value: &str) -> String {
    lower(&hyphenate(value))
}

pub fn snake(value: &str) -> String {
    SNAKE_SEPARATOR.replace_all(value, "_").into_owned()
}

pub fn packaged(value: &str) -> String {
    value.replace('.', "/")
}

/// Appends a fresh random token. The only filter that is not idempotent.
pub fn random(value: &str) -> String {
    format!("{}{}", value, word(&uuid::Uuid::new_v4().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("h"), "H");
        assert_eq!(capitalize("hello"), "Hello");
    }

    #[test]
    fn test_decapitalize() {
        assert_eq!(decapitalize(""), "");
        assert_eq!(decapitalize("H"), "h");
        assert_eq!(decapitalize("HELLO"), "hELLO");
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(upper("hello world"), "HELLO WORLD");
        assert_eq!(lower("Hello WORLD"), "hello world");
        assert_eq!(start("hello world"), "Hello World");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("The Time Has Come"), "the-time-has-come");
        assert_eq!(hyphenate("a \t b"), "a-b");
    }

    #[test]
    fn test_camel() {
        assert_eq!(camel("hello world"), "HelloWorld");
        assert_eq!(camel_lower("hello world"), "helloWorld");
        assert_eq!(word("my-app.v2!"), "myappv2");
    }

    #[test]
    fn test_snake_and_packaged() {
        assert_eq!(snake("hello world.argle.bargle"), "hello_world_argle_bargle");
        assert_eq!(packaged("com.loyal3.foo"), "com/loyal3/foo");
    }

    #[test]
    fn test_random_appends_word_token() {
        let first = random("pw");
        let second = random("pw");
        assert!(first.starts_with("pw"));
        assert!(first.len() > "pw".len());
        assert_eq!(first, word(&first));
        assert_ne!(first, second);
    }

    #[test]
    fn test_registry_lookup() {
        let registry = FilterRegistry::new();
        assert_eq!(registry.lookup("norm").unwrap()("My App"), "my-app");
        assert_eq!(registry.lookup("Camel").unwrap()("my app"), "MyApp");
        assert_eq!(registry.lookup("camel").unwrap()("my app"), "myApp");
        assert!(matches!(
            registry.lookup("shout"),
            Err(Error::UnknownFilter { name }) if name == "shout"
        ));
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FilterRegistry::empty();
        assert!(registry.lookup("upper").is_err());
        registry.register("reverse", |v| v.chars().rev().collect());
        assert_eq!(registry.lookup("reverse").unwrap()("abc"), "cba");
    }
}
