//! CLI argument definitions for the dermarch toolkit.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dermarch",
    version,
    about = "Dermarch - Normalize and summarize lesion image metadata",
    long_about = "Normalize submitted lesion image metadata into the typed archive schema.\n\n\
                  Applies CSV rows to a JSON image record store and builds faceted\n\
                  histogram summaries over the stored records."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow raw metadata values in log output.
    ///
    /// Submitted cells can carry identifying health information, so logs
    /// show `[REDACTED]` in their place unless this flag is set.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply a metadata CSV to the image record store.
    Apply(ApplyArgs),

    /// Build a faceted histogram over the image record store.
    Histogram(HistogramArgs),

    /// List the recognized metadata fields.
    Fields,
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Path to the submitted metadata CSV.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Path to the JSON image record store.
    #[arg(long = "records", value_name = "PATH")]
    pub records: PathBuf,

    /// CSV column naming the image each row applies to.
    #[arg(long = "image-column", value_name = "NAME", default_value = "name")]
    pub image_column: String,

    /// Validate and report without writing the record store.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also parse retired catalog fields.
    ///
    /// By default retired fields are treated as unrecognized columns and
    /// kept as unstructured metadata. Use this flag when re-applying
    /// historical submissions that still carry them.
    #[arg(long = "all-fields")]
    pub all_fields: bool,
}

#[derive(Parser)]
pub struct HistogramArgs {
    /// Path to the JSON image record store.
    #[arg(long = "records", value_name = "PATH")]
    pub records: PathBuf,

    /// Count only records from this dataset (repeatable).
    #[arg(long = "dataset", value_name = "NAME")]
    pub datasets: Vec<String>,

    /// Limit the view to this dataset before any counting, as for a
    /// caller without archive-wide access (repeatable).
    #[arg(long = "visible-dataset", value_name = "NAME")]
    pub visible_datasets: Vec<String>,

    /// Write the histogram JSON to a file instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Pretty-print the histogram JSON.
    #[arg(long = "pretty")]
    pub pretty: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
