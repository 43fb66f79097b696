//! The extract / transform / load pipeline run for each catalog entry.

use dermarch_model::{FieldError, ImageMetadata, MetadataValue, RawRow};

use crate::catalog::{FieldSpec, LoadRule, ValueKind};

/// Result of scanning a row for one field's aliases.
enum Extracted {
    /// No alias appears in the row. Harmless, the field is skipped.
    Absent,
    /// Exactly one alias appeared; its cell has been removed from the row.
    Cell(Option<String>),
}

impl FieldSpec {
    /// Parses this field out of `row` and loads it into `metadata`.
    ///
    /// An absent field is a no-op. Any error leaves `metadata` untouched
    /// for this field; a multiple-match error also leaves the competing
    /// cells in the row.
    pub(crate) fn run(
        &self,
        row: &mut RawRow,
        metadata: &mut ImageMetadata,
    ) -> Result<(), FieldError> {
        let cell = match self.extract(row)? {
            Extracted::Absent => return Ok(()),
            Extracted::Cell(cell) => cell,
        };
        let value = self.transform(cell.as_deref())?;
        self.load(value, metadata)
    }

    /// Scans the row's keys case-insensitively against this field's
    /// aliases. A single match consumes the cell. Competing matches are
    /// reported with the offending keys in sorted order and stay in the
    /// row, so they surface downstream as unstructured data.
    fn extract(&self, row: &mut RawRow) -> Result<Extracted, FieldError> {
        let mut found: Vec<String> = row
            .keys()
            .filter(|key| {
                let lowered = key.to_lowercase();
                self.aliases.contains(&lowered.as_str())
            })
            .map(ToOwned::to_owned)
            .collect();

        match found.len() {
            0 => Ok(Extracted::Absent),
            1 => {
                let key = found.remove(0);
                Ok(Extracted::Cell(row.remove(&key).flatten()))
            }
            _ => {
                found.sort_unstable();
                Err(FieldError::MultipleFields {
                    name: self.name.to_string(),
                    found,
                })
            }
        }
    }

    /// Cleans the raw cell and coerces it to this field's value type.
    ///
    /// A null cell, the empty string, `unknown`, and any field-specific
    /// null token all become [`MetadataValue::Missing`]. Everything else
    /// is trimmed, lowercased, rewritten through the substitution table,
    /// and coerced.
    fn transform(&self, raw: Option<&str>) -> Result<MetadataValue, FieldError> {
        let Some(raw) = raw else {
            return Ok(MetadataValue::Missing);
        };

        let cleaned = raw.trim().to_lowercase();
        if cleaned.is_empty()
            || cleaned == "unknown"
            || self.null_tokens.contains(&cleaned.as_str())
        {
            return Ok(MetadataValue::Missing);
        }

        let cleaned = match self
            .substitutions
            .iter()
            .find(|(from, _)| *from == cleaned)
        {
            Some((_, to)) => (*to).to_string(),
            None => cleaned,
        };

        self.coerce(&cleaned)
    }

    fn coerce(&self, value: &str) -> Result<MetadataValue, FieldError> {
        match self.kind {
            ValueKind::Integer { max } => {
                let parsed: f64 = value.parse().map_err(|_| self.bad_type(value))?;
                if !parsed.is_finite() {
                    return Err(self.bad_type(value));
                }
                // Truncates toward zero: "47.0" and "47.9" both land on 47.
                let coerced = parsed as i64;
                let coerced = match max {
                    Some(max) if coerced > max => max,
                    _ => coerced,
                };
                Ok(MetadataValue::Integer(coerced))
            }
            ValueKind::Float => {
                let parsed: f64 = value.parse().map_err(|_| self.bad_type(value))?;
                Ok(MetadataValue::Float(parsed))
            }
            ValueKind::Flag => match value {
                "true" | "yes" => Ok(MetadataValue::Flag(true)),
                "false" | "no" => Ok(MetadataValue::Flag(false)),
                _ => Err(self.bad_type(value)),
            },
            ValueKind::Enumerated { allowed } => {
                if allowed.contains(&value) {
                    Ok(MetadataValue::Text(value.to_string()))
                } else {
                    Err(self.bad_type(value))
                }
            }
        }
    }

    /// Writes the value into its target bucket(s). Every target is
    /// conflict-checked before any write happens, so a rejected load
    /// changes nothing.
    fn load(&self, value: MetadataValue, metadata: &mut ImageMetadata) -> Result<(), FieldError> {
        match self.load {
            LoadRule::Clinical => {
                metadata.clinical.check_write(self.name, &value)?;
                metadata.clinical.insert(self.name, value);
                Ok(())
            }
            LoadRule::PrivateWithDerived {
                derived_name,
                derive,
            } => {
                let derived = derive(&value);
                metadata.private.check_write(self.name, &value)?;
                metadata.clinical.check_write(derived_name, &derived)?;
                metadata.private.insert(self.name, value);
                metadata.clinical.insert(derived_name, derived);
                Ok(())
            }
        }
    }

    fn bad_type(&self, value: &str) -> FieldError {
        FieldError::BadType {
            name: self.name.to_string(),
            expected: self.kind.expected(),
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use dermarch_model::{FieldError, ImageMetadata, MetadataValue, RawRow};

    use crate::catalog::{FieldSpec, field_spec};

    fn spec(name: &str) -> &'static FieldSpec {
        field_spec(name).expect("catalog entry")
    }

    #[test]
    fn extract_matches_aliases_case_insensitively() {
        let mut row: RawRow = [("GENDER", "f")].into_iter().collect();
        let mut metadata = ImageMetadata::new();
        spec("sex").run(&mut row, &mut metadata).expect("parse sex");
        assert_eq!(
            metadata.clinical.get("sex"),
            Some(&MetadataValue::Text("female".to_string()))
        );
        assert!(row.is_empty());
    }

    #[test]
    fn extract_rejects_competing_keys_and_leaves_them() {
        let mut row: RawRow = [("Sex", "male"), ("gender", "female")].into_iter().collect();
        let mut metadata = ImageMetadata::new();
        let error = spec("sex").run(&mut row, &mut metadata).unwrap_err();
        assert_eq!(
            error.to_string(),
            "only one of field 'sex' may be present, found: Sex, gender"
        );
        assert_eq!(row.len(), 2);
        assert!(metadata.clinical.is_empty());
    }

    #[test]
    fn transform_whitespace_and_unknown_become_missing() {
        for raw in [None, Some(""), Some("   "), Some("unknown"), Some(" UNKNOWN ")] {
            let value = spec("diagnosis").transform(raw).expect("transform");
            assert_eq!(value, MetadataValue::Missing, "raw {raw:?}");
        }
    }

    #[test]
    fn transform_age_cap_marker_and_clamp() {
        let age = spec("age");
        assert_eq!(
            age.transform(Some("85+")).expect("cap marker"),
            MetadataValue::Integer(85)
        );
        assert_eq!(
            age.transform(Some("120")).expect("clamp"),
            MetadataValue::Integer(85)
        );
        assert_eq!(
            age.transform(Some("47.0")).expect("float syntax"),
            MetadataValue::Integer(47)
        );
    }

    #[test]
    fn transform_rejects_non_finite_integers() {
        let age = spec("age");
        for raw in ["inf", "-inf", "nan", "old"] {
            let error = age.transform(Some(raw)).unwrap_err();
            assert!(
                matches!(error, FieldError::BadType { .. }),
                "raw {raw}"
            );
        }
    }

    #[test]
    fn transform_boolean_tokens() {
        let melanocytic = spec("melanocytic");
        assert_eq!(
            melanocytic.transform(Some("Yes")).expect("yes"),
            MetadataValue::Flag(true)
        );
        assert_eq!(
            melanocytic.transform(Some("no")).expect("no"),
            MetadataValue::Flag(false)
        );
        assert!(melanocytic.transform(Some("maybe")).is_err());
    }

    #[test]
    fn transform_restores_canonical_casing() {
        let diagnosis = spec("diagnosis");
        assert_eq!(
            diagnosis.transform(Some("AIMP")).expect("aimp"),
            MetadataValue::Text("AIMP".to_string())
        );
        assert_eq!(
            diagnosis.transform(Some("Lentigo NOS")).expect("lentigo"),
            MetadataValue::Text("lentigo NOS".to_string())
        );
        assert_eq!(
            diagnosis
                .transform(Some("Caf\u{e9}-au-lait Macule"))
                .expect("accent fold"),
            MetadataValue::Text("cafe-au-lait macule".to_string())
        );
    }

    #[test]
    fn transform_enumerated_rejection_lists_vocabulary() {
        let sex = spec("sex");
        let error = sex.transform(Some("intersex")).unwrap_err();
        assert_eq!(
            error.to_string(),
            "value is wrong type for field 'sex' (expected one of [female, male], value: 'intersex')"
        );
    }

    #[test]
    fn transform_retired_field_null_token() {
        let nevus_type = spec("nevus_type");
        assert_eq!(
            nevus_type
                .transform(Some("Not Applicable"))
                .expect("null token"),
            MetadataValue::Missing
        );
        assert_eq!(
            nevus_type.transform(Some("nevus nos")).expect("casing fix"),
            MetadataValue::Text("nevus NOS".to_string())
        );
    }

    #[test]
    fn load_checks_both_targets_before_writing_either() {
        let age = spec("age");
        let mut metadata = ImageMetadata::new();
        metadata
            .clinical
            .insert("age_approx", MetadataValue::Integer(50));

        // private.age is empty, but the derived write would conflict, so
        // neither bucket may change.
        let error = age
            .load(MetadataValue::Integer(47), &mut metadata)
            .unwrap_err();
        assert!(matches!(error, FieldError::ValueExists { .. }));
        assert_eq!(metadata.private.get("age"), None);
        assert_eq!(
            metadata.clinical.get("age_approx"),
            Some(&MetadataValue::Integer(50))
        );
    }

    #[test]
    fn load_missing_age_derives_missing_bucket() {
        let age = spec("age");
        let mut metadata = ImageMetadata::new();
        age.load(MetadataValue::Missing, &mut metadata)
            .expect("load null age");
        assert_eq!(metadata.private.get("age"), Some(&MetadataValue::Missing));
        assert_eq!(
            metadata.clinical.get("age_approx"),
            Some(&MetadataValue::Missing)
        );
    }
}
