//! JSON image record store.
//!
//! The store is a single JSON file holding an array of [`ImageRecord`]
//! values. `apply` reads the whole array, mutates records in memory,
//! and writes the array back only when the batch is clean.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dermarch_model::ImageRecord;

/// Reads every record from the store at `path`.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not a JSON
/// array of image records.
pub fn load_records(path: &Path) -> Result<Vec<ImageRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read record store {}", path.display()))?;
    let records: Vec<ImageRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse record store {}", path.display()))?;
    tracing::debug!(count = records.len(), path = %path.display(), "Loaded record store");
    Ok(records)
}

/// Writes every record back to the store at `path`.
///
/// The file is pretty-printed so record stores diff cleanly under
/// version control.
///
/// # Errors
///
/// Returns an error when serialization or the write fails.
pub fn save_records(path: &Path, records: &[ImageRecord]) -> Result<()> {
    let mut body =
        serde_json::to_string_pretty(records).context("failed to serialize record store")?;
    body.push('\n');
    fs::write(path, body)
        .with_context(|| format!("failed to write record store {}", path.display()))?;
    tracing::debug!(count = records.len(), path = %path.display(), "Saved record store");
    Ok(())
}
