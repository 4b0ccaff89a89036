// redactum-core/src/lib.rs
//! # Redactum Core Library
//!
//! `redactum-core` finds sensitive spans of text with pluggable detectors,
//! merges overlapping findings, lets pluggable transforms rewrite the merged
//! set, and rebuilds the text with every span replaced.
//!
//! The library performs no I/O beyond optional configuration loading and
//! keeps no state between calls apart from the plugins a [`Scrubber`] holds.
//!
//! ## Modules
//!
//! * `span`: The [`Span`] value type and span merging.
//! * `plugin`: The [`Detector`] and [`Transform`] traits.
//! * `catalog`: The immutable name-to-constructor [`Catalog`].
//! * `registry`: Ordered, uniquely-named detector and transform registries.
//! * `collector`: Runs detectors over one or many documents.
//! * `merger`: Canonical ordering and merging of overlapping spans.
//! * `pipeline`: Applies transforms to a merged span list.
//! * `reconstruct`: Rebuilds text from spans.
//! * `scrubber`: The [`Scrubber`] orchestrator.
//! * `config`: YAML rule and scrubber configuration.
//! * `detectors`: Built-in detectors ([`RegexDetector`]).
//! * `transforms`: Built-in transforms.
//! * `validators`: Programmatic checks for regex matches.
//! * `summary`: Per-kind reporting.
//! * `headless`: One-shot helpers for non-interactive use.
//!
//! ## Usage Example
//!
//! ```rust
//! use redactum_core::{Catalog, CleanOptions, Documents, Scrubber};
//!
//! fn main() -> redactum_core::Result<()> {
//!     // 1. The built-in catalog: embedded regex rules plus the built-in transforms.
//!     let catalog = Catalog::builtin()?;
//!
//!     // 2. A scrubber with two named detectors and no transforms.
//!     let scrubber = Scrubber::builder(catalog)
//!         .detectors(["email", "us_ssn"])
//!         .build()?;
//!
//!     // 3. Clean one document.
//!     let clean = scrubber.clean("Mail test@example.com, SSN 123-45-6789.", &CleanOptions::default())?;
//!     assert_eq!(clean, "Mail {{EMAIL}}, SSN {{SOCIAL_SECURITY_NUMBER}}.");
//!
//!     // 4. Clean a batch; the output has the input's shape.
//!     let docs = Documents::from([("x", "a@b.com"), ("y", "no filth here")]);
//!     let out = scrubber.clean_documents(&docs, &CleanOptions::default())?;
//!     assert_eq!(out.get("y"), Some("no filth here"));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`ScrubError`] through the crate's
//! [`Result`] alias. The headless helpers return `anyhow::Result` with
//! context attached.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod catalog;
pub mod collector;
pub mod config;
pub mod detectors;
pub mod documents;
pub mod errors;
pub mod headless;
pub mod merger;
pub mod options;
pub mod pipeline;
pub mod plugin;
pub mod reconstruct;
pub mod registry;
pub mod scrubber;
pub mod span;
pub mod summary;
pub mod transforms;
pub mod validators;

/// Re-exports the configuration types and functions for managing rules.
pub use config::{
    config_candidate_paths, merge_rules, RegexRule, ScrubberConfig, TokenConfig, MAX_PATTERN_LENGTH,
};

/// Re-exports the error type and result alias.
pub use errors::{Result, ScrubError};

/// Re-exports the pipeline building blocks.
pub use catalog::{Catalog, CatalogBuilder, CatalogEntry, Factory};
pub use collector::{SpanCollector, SpanStream};
pub use documents::Documents;
pub use merger::{merge_spans, MergeIter};
pub use options::CleanOptions;
pub use pipeline::TransformPipeline;
pub use plugin::{Detector, Plugin, PluginSpec, SpanIter, Transform};
pub use reconstruct::rebuild;
pub use registry::{DetectorRegistry, TransformRegistry};
pub use scrubber::{Scrubber, ScrubberBuilder, SpanMode};
pub use span::{redact_sensitive, Span};

/// Re-exports the built-in plugins.
pub use detectors::RegexDetector;
pub use transforms::{KindReplacer, PrefixSuffixReplacer, TokenReplacer};

/// Re-exports reporting and one-shot helpers.
pub use headless::{headless_clean_documents, headless_clean_string};
pub use summary::{summarize, SpanSummaryItem};
