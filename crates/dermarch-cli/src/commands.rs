use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use dermarch_cli::ingest::{BatchReport, apply_csv};
use dermarch_cli::store::{load_records, save_records};
use dermarch_facet::{DatasetVisibility, IMAGE_FACETS, histogram};
use dermarch_metadata::FieldRegistry;
use dermarch_model::ImageRecord;

use crate::cli::{ApplyArgs, HistogramArgs};
use crate::summary::apply_table_style;

/// What `apply` did, for the terminal summary and the exit code.
pub struct ApplyResult {
    pub csv: PathBuf,
    pub records: PathBuf,
    pub batch: BatchReport,
    pub has_errors: bool,
    pub dry_run: bool,
    pub persisted: bool,
}

pub fn run_apply(args: &ApplyArgs) -> Result<ApplyResult> {
    let apply_span = info_span!("apply", csv = %args.csv.display());
    let _apply_guard = apply_span.enter();

    let mut records = load_records(&args.records)?;
    let registry = if args.all_fields {
        FieldRegistry::complete()
    } else {
        FieldRegistry::standard()
    };
    let batch = apply_csv(&args.csv, &args.image_column, &registry, &mut records)?;

    // Whole-batch gate: one bad row keeps every row out of the store.
    let has_errors = batch.has_errors();
    let persisted = !has_errors && !args.dry_run;
    if persisted {
        save_records(&args.records, &records)?;
        info!(
            rows = batch.rows.len(),
            path = %args.records.display(),
            "Record store updated"
        );
    } else {
        info!(
            errors = batch.error_count(),
            dry_run = args.dry_run,
            "Record store left unchanged"
        );
    }

    Ok(ApplyResult {
        csv: args.csv.clone(),
        records: args.records.clone(),
        batch,
        has_errors,
        dry_run: args.dry_run,
        persisted,
    })
}

pub fn run_histogram(args: &HistogramArgs) -> Result<()> {
    let records = load_records(&args.records)?;

    let visibility = if args.visible_datasets.is_empty() {
        DatasetVisibility::All
    } else {
        DatasetVisibility::only(args.visible_datasets.iter().cloned())
    };
    let wanted: BTreeSet<String> = args.datasets.iter().cloned().collect();
    let criteria =
        |record: &ImageRecord| wanted.is_empty() || wanted.contains(record.dataset.as_str());

    let result = histogram(&records, &visibility, criteria, IMAGE_FACETS);
    info!(count = result.count, "Built histogram");

    let mut body = if args.pretty {
        serde_json::to_string_pretty(&result).context("failed to serialize histogram")?
    } else {
        serde_json::to_string(&result).context("failed to serialize histogram")?
    };
    body.push('\n');
    match &args.output {
        Some(path) => {
            fs::write(path, body)
                .with_context(|| format!("failed to write histogram to {}", path.display()))?;
            info!(path = %path.display(), "Histogram written");
        }
        None => print!("{body}"),
    }
    Ok(())
}

pub fn run_fields() {
    let mut table = Table::new();
    table.set_header(vec!["Name", "Aliases", "Type", "Bucket", "Active"]);
    apply_table_style(&mut table);
    for spec in FieldRegistry::complete().fields() {
        table.add_row(vec![
            spec.name.to_string(),
            spec.aliases.join(", "),
            spec.kind.label().to_string(),
            spec.load.label().to_string(),
            if spec.active { "yes" } else { "retired" }.to_string(),
        ]);
    }
    println!("{table}");
}
