// redactum/src/cli.rs
//! This file defines the command-line interface (CLI) for the redactum
//! application, including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "redactum",
    version = env!("CARGO_PKG_VERSION"),
    about = "Redact sensitive spans from text and document batches",
    long_about = "Redactum finds sensitive spans (emails, card numbers, credentials, ...) with configurable detectors, merges overlapping findings, optionally rewrites them with transforms such as consistent tokens, and prints the cleaned text.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable all log output
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `redactum` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cleans stdin or the given files, replacing every detected span.
    #[command(about = "Clean stdin or files, replacing every detected span.")]
    Clean(CleanCommand),

    /// Scans input and prints a per-kind summary without redacting.
    #[command(about = "Scan input and print a per-kind summary without redacting.")]
    Scan(ScanCommand),

    /// Lists the detectors and transforms available by name.
    #[command(about = "List catalog entries and whether they load by default.")]
    List(ListCommand),
}

/// Where input comes from and which plugins process it.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Input files; each becomes a document keyed by its path. Reads stdin when empty.
    #[arg(long = "input", short = 'i', value_name = "FILE", help = "Read a document from FILE (repeatable). Reads stdin when omitted.")]
    pub input_files: Vec<PathBuf>,

    /// Path to a custom configuration file (YAML).
    #[arg(long = "config", short = 'c', value_name = "FILE", help = "Path to a custom configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Load only these detectors (comma-separated catalog names).
    #[arg(long, value_delimiter = ',', value_name = "NAMES", help = "Load only these detectors (comma-separated).")]
    pub detectors: Vec<String>,

    /// Apply these transforms in order (comma-separated catalog names).
    #[arg(long, value_delimiter = ',', value_name = "NAMES", help = "Apply these transforms in order (comma-separated).")]
    pub transforms: Vec<String>,

    /// Treat the input as a JSON array or object of documents.
    #[arg(long, help = "Read input as a JSON array or object of documents and write the same shape.")]
    pub json: bool,
}

/// Arguments for the `clean` command.
#[derive(Parser, Debug)]
pub struct CleanCommand {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print the summary as JSON instead of a table.
    #[arg(long = "json-summary", help = "Print the summary to stdout as JSON.")]
    pub json_summary: bool,

    /// Exit with an error when more spans than this are found.
    #[arg(long = "fail-over-threshold", value_name = "N", help = "Exit with a non-zero code if more than N spans are detected.")]
    pub fail_over_threshold: Option<usize>,
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListCommand {
    /// Path to a custom configuration file (YAML).
    #[arg(long = "config", short = 'c', value_name = "FILE", help = "Path to a custom configuration file (YAML).")]
    pub config: Option<PathBuf>,
}
