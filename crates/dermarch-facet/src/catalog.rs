//! Declarative catalog of the facets the archive summarizes.

use dermarch_model::{ImageRecord, MetadataValue};

/// How a facet tallies the records that pass the filters.
#[derive(Debug, Clone, Copy)]
pub enum FacetKind {
    /// One bin per distinct value; records without the value share the
    /// null bin.
    Categorical,
    /// One increment per tag occurrence; untagged records count once in
    /// the null bin.
    Tag,
    /// Half-open `[low, high)` intervals between consecutive boundaries.
    /// Values outside the range, non-numeric values, and nulls share the
    /// default bin.
    Ordinal { boundaries: &'static [f64] },
}

/// One summarized facet: a selector into the record plus a tally rule.
#[derive(Debug, Clone, Copy)]
pub struct FacetSpec {
    /// Dotted selector: `dataset`, `tags`, or `clinical.<field>`.
    pub field: &'static str,
    pub kind: FacetKind,
}

impl FacetSpec {
    /// Resolves the selector against a record. Absent fields and unknown
    /// paths resolve to null so they can be tallied rather than dropped.
    pub fn resolve(&self, record: &ImageRecord) -> MetadataValue {
        if self.field == "dataset" {
            return MetadataValue::Text(record.dataset.clone());
        }
        match self.field.strip_prefix("clinical.") {
            Some(name) => record
                .metadata
                .clinical
                .get(name)
                .cloned()
                .unwrap_or(MetadataValue::Missing),
            None => MetadataValue::Missing,
        }
    }
}

pub const AGE_BOUNDARIES: &[f64] = &[
    0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0,
];

pub const SIZE_BOUNDARIES: &[f64] = &[
    0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0,
];

/// The standard facet set for image collections.
pub static IMAGE_FACETS: &[FacetSpec] = &[
    FacetSpec {
        field: "dataset",
        kind: FacetKind::Categorical,
    },
    FacetSpec {
        field: "clinical.benign_malignant",
        kind: FacetKind::Categorical,
    },
    FacetSpec {
        field: "clinical.sex",
        kind: FacetKind::Categorical,
    },
    FacetSpec {
        field: "clinical.diagnosis_confirm_type",
        kind: FacetKind::Categorical,
    },
    FacetSpec {
        field: "clinical.diagnosis",
        kind: FacetKind::Categorical,
    },
    FacetSpec {
        field: "clinical.nevus_type",
        kind: FacetKind::Categorical,
    },
    FacetSpec {
        field: "clinical.melanocytic",
        kind: FacetKind::Categorical,
    },
    FacetSpec {
        field: "clinical.personal_hx_mm",
        kind: FacetKind::Categorical,
    },
    FacetSpec {
        field: "clinical.family_hx_mm",
        kind: FacetKind::Categorical,
    },
    FacetSpec {
        field: "tags",
        kind: FacetKind::Tag,
    },
    FacetSpec {
        field: "clinical.age_approx",
        kind: FacetKind::Ordinal {
            boundaries: AGE_BOUNDARIES,
        },
    },
    FacetSpec {
        field: "clinical.clin_size_long_diam_mm",
        kind: FacetKind::Ordinal {
            boundaries: SIZE_BOUNDARIES,
        },
    },
];
