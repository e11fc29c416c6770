//! Field values driving a single generation run.

use indexmap::IndexMap;

use crate::constants::{DESCRIPTION_FIELD, NAME_FIELD, VERBATIM_FIELD};
use crate::error::{Error, Result};
use crate::filters::normalize;
use crate::verbatim::parse_verbatim_list;

/// Ordered mapping of field names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(IndexMap<String, String>);

/// System fields pulled out of a [`FieldMap`] before rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedFields {
    /// Raw value of `name`, if any.
    pub name: Option<String>,
    /// Patterns from `verbatim`, split on commas, semicolons and whitespace.
    pub verbatim: Vec<String>,
}

impl ReservedFields {
    /// The top-level directory name: `name` normalized once.
    ///
    /// # Errors
    /// * `Error::TargetNameError` if `name` is absent or normalizes to an empty string
    pub fn target_name(&self) -> Result<String> {
        let target = normalize(self.name.as_deref().unwrap_or_default());
        if target.is_empty() {
            return Err(Error::TargetNameError);
        }
        Ok(target)
    }
}

impl FieldMap {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Strips the system fields before any rendering starts.
    ///
    /// `description` and `verbatim` are removed. `name` is read but stays in the map,
    /// since templates routinely reference it as `$name$`.
    pub fn take_reserved(&mut self) -> ReservedFields {
        self.remove(DESCRIPTION_FIELD);
        let verbatim = self
            .remove(VERBATIM_FIELD)
            .map(|value| parse_verbatim_list(&value))
            .unwrap_or_default();
        let name = self.get(NAME_FIELD).map(str::to_string);

        ReservedFields { name, verbatim }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
