//! errors.rs - Custom error types for the redactum-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//! Every failure raised while registering plugins or running the pipeline is
//! returned synchronously to the caller; nothing is retried internally.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `redactum-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScrubError {
    /// A catalog entry resolved to a plugin of the wrong kind
    /// (e.g. a transform name passed to `add_detector_named`).
    #[error("'{name}' does not satisfy the {expected} capability (catalog entry is a {found})")]
    TypeConstraintViolation {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("can not add {plugin} '{name}', this name is already in use. Try removing it first.")]
    DuplicateName { plugin: &'static str, name: String },

    #[error("Unknown {plugin}: '{name}'")]
    UnknownIdentifier { plugin: &'static str, name: String },

    #[error("Detector '{detector}' produced an invalid span: {reason}")]
    InvalidProducerOutput { detector: String, reason: String },

    #[error("Invalid document collection: {0}. Expected a list of strings or a map of document name to string.")]
    InvalidDocumentCollection(String),

    #[error("Cannot merge spans from different documents ({left:?} and {right:?})")]
    DocumentMismatch {
        left: Option<String>,
        right: Option<String>,
    },

    #[error("Transform '{name}' failed: {message}")]
    Transform { name: String, message: String },

    #[error("Failed to compile redaction rule '{0}': {1}")]
    RuleCompilation(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("An unexpected I/O error occurred: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the core library.
pub type Result<T> = std::result::Result<T, ScrubError>;
