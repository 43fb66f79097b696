//! Normalizes free-form lesion image metadata into the typed archive schema.
//!
//! Submitted rows arrive with arbitrary column names and inconsistent
//! formatting. The field catalog ([`catalog::FIELD_CATALOG`]) declares what
//! the archive recognizes; [`FieldRegistry::apply`] runs the catalog over a
//! row, loading typed values into the clinical and private buckets and
//! preserving everything unrecognized as unstructured metadata.

pub mod applier;
pub mod catalog;
mod parser;

pub use applier::{FieldRegistry, apply_metadata};
pub use catalog::{FIELD_CATALOG, FieldSpec, LoadRule, ValueKind, field_spec};

#[cfg(test)]
mod tests {
    use dermarch_model::{ImageMetadata, MetadataValue, RawRow};

    use super::apply_metadata;

    #[test]
    fn full_row_lands_in_the_right_buckets() {
        let mut row: RawRow = [
            ("Age", "47"),
            ("SEX", "f"),
            ("melanocytic", "yes"),
            ("diagnosis", "melanoma"),
            ("biopsy site", "left forearm"),
        ]
        .into_iter()
        .collect();
        let mut metadata = ImageMetadata::new();

        let report = apply_metadata(&mut row, &mut metadata);
        assert!(!report.has_errors(), "{:?}", report.errors);

        assert_eq!(metadata.private.get("age"), Some(&MetadataValue::Integer(47)));
        assert_eq!(
            metadata.clinical.get("age_approx"),
            Some(&MetadataValue::Integer(45))
        );
        assert_eq!(
            metadata.clinical.get("sex"),
            Some(&MetadataValue::Text("female".to_string()))
        );
        assert_eq!(
            metadata.clinical.get("melanocytic"),
            Some(&MetadataValue::Flag(true))
        );
        assert_eq!(
            metadata.clinical.get("diagnosis"),
            Some(&MetadataValue::Text("melanoma".to_string()))
        );
        assert_eq!(
            metadata.unstructured.get("biopsy site"),
            Some(&Some("left forearm".to_string()))
        );
        assert!(row.is_empty());
    }
}
