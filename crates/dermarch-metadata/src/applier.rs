//! Applies the field catalog to raw rows.

use dermarch_model::{ApplyReport, ImageMetadata, RawRow};

use crate::catalog::{FIELD_CATALOG, FieldSpec};

/// An ordered set of catalog entries to run against incoming rows.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<&'static FieldSpec>,
}

impl FieldRegistry {
    /// The active catalog, in processing order. This is what routine
    /// ingest runs.
    pub fn standard() -> Self {
        Self {
            fields: FIELD_CATALOG.iter().filter(|spec| spec.active).collect(),
        }
    }

    /// Every catalog entry, retired ones included. For callers working
    /// with historical submissions that still carry retired columns.
    pub fn complete() -> Self {
        Self {
            fields: FIELD_CATALOG.iter().collect(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        self.fields.iter().copied()
    }

    /// Runs every registered field against `row`, loading recognized
    /// values into `metadata` and collecting per-field errors. A failed
    /// field never stops its siblings. Whatever remains in the row
    /// afterwards is preserved verbatim as unstructured metadata, where a
    /// repeated key from an earlier row is overwritten.
    pub fn apply(&self, row: &mut RawRow, metadata: &mut ImageMetadata) -> ApplyReport {
        let mut report = ApplyReport::new();

        for spec in &self.fields {
            if let Err(error) = spec.run(row, metadata) {
                // Field names are loggable; raw values are not.
                tracing::debug!(
                    field = error.field(),
                    kind = error.kind(),
                    "Rejected metadata field"
                );
                report.errors.push(error);
            }
        }

        if !row.is_empty() {
            tracing::debug!(count = row.len(), "Keeping unrecognized columns as unstructured");
        }
        for (key, value) in row.drain() {
            metadata.unstructured.insert(key, value);
        }

        report
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Applies the standard registry to one row. The entry point for routine
/// clinical metadata ingest.
pub fn apply_metadata(row: &mut RawRow, metadata: &mut ImageMetadata) -> ApplyReport {
    FieldRegistry::standard().apply(row, metadata)
}
