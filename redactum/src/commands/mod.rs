// redactum/src/commands/mod.rs
//! Command implementations and the input/configuration plumbing they share.

pub mod clean;
pub mod list;
pub mod scan;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, info};

use redactum_core::{CleanOptions, Documents, Scrubber, ScrubberConfig};

use crate::cli::InputArgs;

/// Loaded input: one anonymous text, or a batch of documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Documents(Documents),
}

/// Resolves the configuration (explicit file, discovered file, or defaults).
pub fn load_config(path: Option<&Path>) -> Result<ScrubberConfig> {
    let config = ScrubberConfig::discover(path).context("Failed to load configuration")?;
    debug!("Configuration has {} rules.", config.rules.len());
    Ok(config)
}

/// Builds the scrubber described by the configuration, with the command-line
/// plugin lists taking precedence over the configured ones.
pub fn build_scrubber(args: &InputArgs) -> Result<(Scrubber, CleanOptions)> {
    let mut config = load_config(args.config.as_deref())?;
    if !args.detectors.is_empty() {
        config.detectors = Some(args.detectors.clone());
    }
    if !args.transforms.is_empty() {
        config.transforms = Some(args.transforms.clone());
    }
    let scrubber = Scrubber::from_config(&config).context("Failed to set up detectors and transforms")?;
    info!(
        "Using detectors {:?} and transforms {:?}.",
        scrubber.detectors().names(),
        scrubber.transforms().names()
    );
    Ok((scrubber, config.options))
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read input file: {}", path.display()))
}

/// Reads the input the arguments point at.
pub fn read_input(args: &InputArgs) -> Result<Input> {
    if args.json {
        let raw = match args.input_files.as_slice() {
            [] => read_stdin()?,
            [path] => read_file(path)?,
            _ => bail!("--json accepts at most one input file"),
        };
        let documents = Documents::from_json_str(&raw).context("Failed to parse JSON documents")?;
        return Ok(Input::Documents(documents));
    }

    if args.input_files.is_empty() {
        return Ok(Input::Text(read_stdin()?));
    }

    args.input_files
        .iter()
        .map(|path| -> Result<(String, String)> { Ok((path.display().to_string(), read_file(path)?)) })
        .collect::<Result<Documents>>()
        .map(Input::Documents)
}
