// File: redactum-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot, non-interactive use: build a scrubber
//! from a configuration and run a single call with it.

use anyhow::{Context, Result};

use crate::config::ScrubberConfig;
use crate::documents::Documents;
use crate::options::CleanOptions;
use crate::scrubber::Scrubber;

/// Cleans `content` with a scrubber built from `config`.
///
/// # Arguments
///
/// * `config` - The merged ScrubberConfig (defaults + optional user overrides).
/// * `options` - Placeholder options for spans without a fixed replacement.
/// * `content` - The string to be cleaned.
pub fn headless_clean_string(config: &ScrubberConfig, options: &CleanOptions, content: &str) -> Result<String> {
    let scrubber = Scrubber::from_config(config).context("Failed to build scrubber from configuration")?;
    scrubber
        .clean(content, options)
        .context("Failed to clean input")
}

/// Cleans a batch of documents with a scrubber built from `config`.
pub fn headless_clean_documents(
    config: &ScrubberConfig,
    options: &CleanOptions,
    documents: &Documents,
) -> Result<Documents> {
    let scrubber = Scrubber::from_config(config).context("Failed to build scrubber from configuration")?;
    scrubber
        .clean_documents(documents, options)
        .context("Failed to clean documents")
}
