//! Typed metadata buckets with conflict-safe writes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{FieldError, MetadataValue};

/// An ordered mapping from canonical field names to normalized values.
///
/// Writes go through [`Bucket::check_write`] first: an existing non-null
/// value may only be rewritten with an equal value. Overwriting a null is
/// always allowed, so later uploads can fill in fields an earlier upload
/// marked unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bucket(BTreeMap<String, MetadataValue>);

impl Bucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&MetadataValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Checks that `value` can safely be written under `name`.
    ///
    /// The write is allowed when the field is absent, currently null, or
    /// already holds an equal value. Otherwise the existing value is
    /// protected and a [`FieldError::ValueExists`] is returned.
    pub fn check_write(&self, name: &str, value: &MetadataValue) -> Result<(), FieldError> {
        match self.0.get(name) {
            Some(old) if !old.is_missing() && old != value => Err(FieldError::ValueExists {
                name: name.to_string(),
                old: old.clone(),
                new: value.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Unconditional write. Callers enforcing conflict semantics must call
    /// [`Bucket::check_write`] first.
    pub fn insert(&mut self, name: impl Into<String>, value: MetadataValue) -> Option<MetadataValue> {
        self.0.insert(name.into(), value)
    }
}

impl FromIterator<(String, MetadataValue)> for Bucket {
    fn from_iter<I: IntoIterator<Item = (String, MetadataValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
