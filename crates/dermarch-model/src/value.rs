//! Typed metadata values.
//!
//! Every normalized metadata field holds one of these variants. `Missing`
//! is a real state (the field was supplied but explicitly unknown), distinct
//! from the field being absent from a bucket altogether.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized metadata value.
///
/// Serializes untagged, so buckets round-trip as plain JSON scalars:
/// `null`, booleans, integers, floats, and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Explicitly unknown (empty input, the "unknown" token, or a null cell).
    Missing,
    /// A yes/no clinical flag.
    Flag(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetadataValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, MetadataValue::Missing)
    }

    /// Returns the text content for `Text` values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns a numeric view of `Integer` and `Float` values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Integer(value) => Some(*value as f64),
            MetadataValue::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Missing => f.write_str("null"),
            MetadataValue::Flag(value) => write!(f, "{value}"),
            MetadataValue::Integer(value) => write!(f, "{value}"),
            MetadataValue::Float(value) => write!(f, "{value}"),
            MetadataValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Integer(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Flag(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_json_scalars() {
        assert_eq!(
            serde_json::to_string(&MetadataValue::Missing).unwrap(),
            "null"
        );
        assert_eq!(
            serde_json::to_string(&MetadataValue::Flag(true)).unwrap(),
            "true"
        );
        assert_eq!(
            serde_json::to_string(&MetadataValue::Integer(85)).unwrap(),
            "85"
        );
        assert_eq!(
            serde_json::to_string(&MetadataValue::Text("male".to_string())).unwrap(),
            "\"male\""
        );
    }

    #[test]
    fn deserializes_scalars_back_to_variants() {
        let null: MetadataValue = serde_json::from_str("null").unwrap();
        assert!(null.is_missing());
        let int: MetadataValue = serde_json::from_str("47").unwrap();
        assert_eq!(int, MetadataValue::Integer(47));
        let float: MetadataValue = serde_json::from_str("4.5").unwrap();
        assert_eq!(float, MetadataValue::Float(4.5));
        let flag: MetadataValue = serde_json::from_str("false").unwrap();
        assert_eq!(flag, MetadataValue::Flag(false));
    }

    #[test]
    fn numeric_view_covers_both_numeric_variants() {
        assert_eq!(MetadataValue::Integer(45).as_f64(), Some(45.0));
        assert_eq!(MetadataValue::Float(4.5).as_f64(), Some(4.5));
        assert_eq!(MetadataValue::Text("45".to_string()).as_f64(), None);
    }
}
