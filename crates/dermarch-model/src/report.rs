//! Outcome of applying one metadata row.

use crate::FieldError;

/// Errors and warnings produced while applying a single row.
///
/// Errors mean the row must not be persisted. Warnings flag suspicious but
/// acceptable input and never block a save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    pub errors: Vec<FieldError>,
    pub warnings: Vec<String>,
}

impl ApplyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Rendered error messages, in the order the fields were processed.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}
