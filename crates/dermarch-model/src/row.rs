//! Raw submission rows prior to normalization.

use std::collections::BTreeMap;

/// One row of submitted metadata, keyed by the header exactly as uploaded.
///
/// Cells hold `None` when the source format distinguishes an absent cell
/// from an empty one. Field parsers consume cells by removing them, so a
/// fully parsed row retains only the columns nobody recognized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: BTreeMap<String, Option<String>>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) -> Option<Option<String>> {
        self.fields.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Option<String>> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Removes and returns every remaining cell, leaving the row empty.
    pub fn drain(&mut self) -> impl Iterator<Item = (String, Option<String>)> {
        std::mem::take(&mut self.fields).into_iter()
    }
}

impl FromIterator<(String, Option<String>)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.to_string(), Some(value.to_string())))
                .collect(),
        }
    }
}
