use thiserror::Error;

use crate::MetadataValue;

/// A field-local parse failure.
///
/// All three kinds are recoverable: the applier reports them per field and
/// keeps processing sibling fields. "Field not found" is not represented
/// here because it is not an error; absent fields are silently skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// More than one column in a single row matched the field's alias set.
    #[error("only one of field '{name}' may be present, found: {}", found.join(", "))]
    MultipleFields { name: String, found: Vec<String> },

    /// Type coercion or enumerated-value validation rejected the raw value.
    #[error("value is wrong type for field '{name}' (expected {expected}, value: '{value}')")]
    BadType {
        name: String,
        expected: String,
        value: String,
    },

    /// The bucket already holds a different non-null value for this field.
    /// The existing value is left untouched; first write wins.
    #[error("value already exists for field '{name}' (old: {old}, new: {new})")]
    ValueExists {
        name: String,
        old: MetadataValue,
        new: MetadataValue,
    },
}

impl FieldError {
    /// The canonical field name the error belongs to.
    pub fn field(&self) -> &str {
        match self {
            FieldError::MultipleFields { name, .. }
            | FieldError::BadType { name, .. }
            | FieldError::ValueExists { name, .. } => name,
        }
    }

    /// Short machine-friendly label for the error kind. Safe to log:
    /// contains no raw metadata values.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldError::MultipleFields { .. } => "multiple-fields",
            FieldError::BadType { .. } => "bad-type",
            FieldError::ValueExists { .. } => "value-exists",
        }
    }
}
