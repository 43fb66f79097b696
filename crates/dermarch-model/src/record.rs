//! Image records and their metadata envelope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Bucket;

/// The full metadata envelope carried by an image record.
///
/// Recognized fields land in `clinical` or `private` depending on their
/// catalog entry. Anything the catalog does not recognize is preserved
/// verbatim in `unstructured` so no submitted cell is silently lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    #[serde(default)]
    pub clinical: Bucket,
    #[serde(default)]
    pub private: Bucket,
    #[serde(default)]
    pub unstructured: BTreeMap<String, Option<String>>,
}

impl ImageMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every bucket, returning the record to its pre-ingest state.
    pub fn reset(&mut self) {
        self.clinical.clear();
        self.private.clear();
        self.unstructured.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.clinical.is_empty() && self.private.is_empty() && self.unstructured.is_empty()
    }
}

/// One archived image with its owning dataset, review tags, and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub name: String,
    pub dataset: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: ImageMetadata,
}

impl ImageRecord {
    pub fn new(name: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dataset: dataset.into(),
            tags: Vec::new(),
            metadata: ImageMetadata::new(),
        }
    }
}
