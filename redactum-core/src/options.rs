// File: redactum-core/src/options.rs

//! options.rs - Caller-supplied options for computing replacement text.
//!
//! `CleanOptions` is threaded unchanged from `Scrubber::clean` down to
//! [`Span::replace_with`](crate::span::Span::replace_with), which is the only
//! place that interprets it. Spans carrying a `fixed_replacement` ignore it.
//!
//! License: MIT OR Apache-2.0

use log::warn;
use serde::{Deserialize, Serialize};

/// Options controlling how placeholder replacements are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct CleanOptions {
    /// Text emitted before the span kind, e.g. `{{`.
    pub placeholder_prefix: String,
    /// Text emitted after the span kind, e.g. `}}`.
    pub placeholder_suffix: String,
    /// Upper-case the kind inside the placeholder.
    pub uppercase: bool,
    /// Deprecated call-time replacement override. Configure a transform
    /// instead; setting this only emits a warning.
    pub replace_with: Option<String>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            placeholder_prefix: "{{".to_string(),
            placeholder_suffix: "}}".to_string(),
            uppercase: true,
            replace_with: None,
        }
    }
}

impl CleanOptions {
    pub fn with_placeholder(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.placeholder_prefix = prefix.into();
        self.placeholder_suffix = suffix.into();
        self
    }

    pub fn with_uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    /// Logs a deprecation warning if the legacy `replace_with` override is set.
    /// Returns `true` when a warning was emitted.
    pub fn warn_deprecated(&self) -> bool {
        match &self.replace_with {
            Some(value) => {
                warn!(
                    "Use of replace_with ('{}') is deprecated in favour of transforms; the value is ignored.",
                    value
                );
                true
            }
            None => false,
        }
    }
}
