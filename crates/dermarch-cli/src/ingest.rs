//! Applies a CSV of submitted metadata to stored image records.
//!
//! Every data row names one image; its remaining cells are parsed
//! through the field catalog and loaded into that record's metadata
//! buckets. Problems are collected per row so a partly bad CSV still
//! reports everything wrong with it in one pass.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use dermarch_metadata::FieldRegistry;
use dermarch_model::{ImageRecord, RawRow};

use crate::logging::redact_value;

/// Outcome of one CSV data row.
#[derive(Debug, Clone)]
pub struct RowReport {
    /// 1-based data row number, header row excluded.
    pub row: usize,
    /// Image name the row addressed, when one could be read.
    pub image: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RowReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn failed(row: usize, image: Option<String>, message: String) -> Self {
        Self {
            row,
            image,
            errors: vec![message],
            warnings: Vec::new(),
        }
    }
}

/// Outcome of a whole CSV batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub rows: Vec<RowReport>,
}

impl BatchReport {
    /// Total number of errors across all rows.
    pub fn error_count(&self) -> usize {
        self.rows.iter().map(|report| report.errors.len()).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.rows.iter().any(|report| !report.is_clean())
    }

    pub fn clean_rows(&self) -> usize {
        self.rows.iter().filter(|report| report.is_clean()).count()
    }
}

/// Applies every row of the CSV at `csv_path` to `records`.
///
/// Rows are matched to records by the `image_column` cell. Records are
/// mutated in place even when some rows fail; the caller decides from
/// the report whether the mutated set is worth keeping.
///
/// # Errors
///
/// Returns an error when the CSV cannot be opened or carries no
/// `image_column` header. Row-level problems never abort the batch and
/// land in the report instead.
pub fn apply_csv(
    csv_path: &Path,
    image_column: &str,
    registry: &FieldRegistry,
    records: &mut [ImageRecord],
) -> Result<BatchReport> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(csv_path)
        .with_context(|| format!("failed to open metadata csv {}", csv_path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read csv headers from {}", csv_path.display()))?
        .clone();

    let Some(image_index) = headers.iter().position(|header| header == image_column) else {
        bail!("metadata csv has no '{image_column}' column");
    };

    let mut by_name: BTreeMap<String, usize> = BTreeMap::new();
    for (position, record) in records.iter().enumerate() {
        by_name.insert(record.name.clone(), position);
    }

    let mut batch = BatchReport::default();
    for (number, result) in reader.records().enumerate() {
        let row_number = number + 1;
        let csv_row = match result {
            Ok(csv_row) => csv_row,
            Err(error) => {
                tracing::warn!(row = row_number, "Skipped malformed csv row");
                batch.rows.push(RowReport::failed(
                    row_number,
                    None,
                    format!("malformed csv row: {error}"),
                ));
                continue;
            }
        };

        let mut row = RawRow::new();
        let mut image = None;
        for (position, (header, cell)) in headers.iter().zip(csv_row.iter()).enumerate() {
            if position == image_index {
                image = Some(cell.trim().to_string());
            } else {
                // Cells stay verbatim; the field parsers do their own
                // trimming and anything unrecognized is kept as uploaded.
                row.insert(header, Some(cell.to_string()));
            }
        }
        let Some(image) = image else {
            batch.rows.push(RowReport::failed(
                row_number,
                None,
                format!("row has no '{image_column}' cell"),
            ));
            continue;
        };

        let Some(&position) = by_name.get(&image) else {
            tracing::warn!(row = row_number, image = %image, "No image record for csv row");
            batch.rows.push(RowReport::failed(
                row_number,
                Some(image.clone()),
                format!("no image record named '{image}'"),
            ));
            continue;
        };

        let report = registry.apply(&mut row, &mut records[position].metadata);
        for message in report.error_messages() {
            tracing::debug!(
                row = row_number,
                image = %image,
                detail = redact_value(&message),
                "Row produced a field error"
            );
        }
        batch.rows.push(RowReport {
            row: row_number,
            image: Some(image),
            errors: report.error_messages(),
            warnings: report.warnings,
        });
    }

    tracing::info!(
        rows = batch.rows.len(),
        errors = batch.error_count(),
        "Applied metadata csv"
    );
    Ok(batch)
}
