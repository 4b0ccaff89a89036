// redactum-core/src/span.rs
//! Provides the `Span` record produced by detectors and consumed by the merger,
//! the transforms and the text reconstructor, plus logging helpers that keep
//! sensitive text out of debug output.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{Result, ScrubError};
use crate::options::CleanOptions;

lazy_static! {
    /// Initialized once to determine if PII is allowed in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("REDACTUM_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// Separator used when a merged span reports several kinds.
pub const KIND_SEPARATOR: &str = "+";

/// A detected half-open byte range `[begin, end)` in one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
    /// Detector-assigned label, e.g. `email`.
    pub kind: String,
    /// The covered slice of the original document.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub detector_name: Option<String>,
    /// `None` for the single-document case.
    #[serde(default)]
    pub document_id: Option<String>,
    /// When set, reconstruction emits this verbatim.
    #[serde(default)]
    pub fixed_replacement: Option<String>,
    /// Constituent spans when this span is the product of a merge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<Span>,
}

impl Span {
    pub fn new(begin: usize, end: usize, kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            begin,
            end,
            kind: kind.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_detector(mut self, name: impl Into<String>) -> Self {
        self.detector_name = Some(name.into());
        self
    }

    pub fn with_document(mut self, document_id: Option<&str>) -> Self {
        self.document_id = document_id.map(str::to_string);
        self
    }

    pub fn with_fixed_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.fixed_replacement = Some(replacement.into());
        self
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sort key shared by the merger and the reconstructor: unnamed documents
    /// first, then by `begin`, and on equal `begin` the longer span first.
    pub fn sort_key(&self) -> (Option<&str>, usize, Reverse<usize>) {
        (self.document_id.as_deref(), self.begin, Reverse(self.end))
    }

    /// The spans this one was built from, or itself when it was never merged.
    pub fn constituents(&self) -> Vec<&Span> {
        if self.parts.is_empty() {
            vec![self]
        } else {
            self.parts.iter().collect()
        }
    }

    /// Distinct kinds covered by this span, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        self.constituents()
            .into_iter()
            .map(|s| s.kind.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct detector names that contributed to this span, sorted.
    pub fn detector_names(&self) -> Vec<&str> {
        self.constituents()
            .into_iter()
            .filter_map(|s| s.detector_name.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Combines two overlapping or touching spans of the same document into
    /// one covering `min(begin)..max(end)`.
    pub fn merge(&self, other: &Span) -> Result<Span> {
        if self.document_id != other.document_id {
            return Err(ScrubError::DocumentMismatch {
                left: self.document_id.clone(),
                right: other.document_id.clone(),
            });
        }
        Ok(self.merged_with(other))
    }

    /// `merge` without the document check; callers guarantee both spans
    /// belong to the same document.
    pub(crate) fn merged_with(&self, other: &Span) -> Span {
        let (first, second) = if (other.begin, Reverse(other.end)) < (self.begin, Reverse(self.end)) {
            (other, self)
        } else {
            (self, other)
        };

        let text = if second.end > first.end {
            let covered = first.end.saturating_sub(second.begin);
            let tail = second.text.get(covered..).unwrap_or("");
            format!("{}{}", first.text, tail)
        } else {
            first.text.clone()
        };

        let parts: Vec<Span> = first
            .constituents()
            .into_iter()
            .chain(second.constituents())
            .cloned()
            .collect();

        let fixed_replacement = match (&first.fixed_replacement, &second.fixed_replacement) {
            (Some(a), Some(b)) if a == b => Some(a.clone()),
            _ => None,
        };

        let mut merged = Span {
            begin: first.begin,
            end: first.end.max(second.end),
            kind: String::new(),
            text,
            detector_name: None,
            document_id: self.document_id.clone(),
            fixed_replacement,
            parts,
        };
        let kind = merged.kinds().join(KIND_SEPARATOR);
        let names = merged.detector_names().join(KIND_SEPARATOR);
        merged.kind = kind;
        if !names.is_empty() {
            merged.detector_name = Some(names);
        }
        merged
    }

    /// Computes the replacement text for a span without a fixed replacement.
    pub fn replace_with(&self, options: &CleanOptions) -> String {
        let kind = if options.uppercase {
            self.kind.to_uppercase()
        } else {
            self.kind.clone()
        };
        format!("{}{}{}", options.placeholder_prefix, kind, options.placeholder_suffix)
    }
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_span_debug(module_path: &str, span: &Span) {
    debug!(
        "{} Found span: Detector='{}', Kind='{}', Document={:?}, Range={}..{}, Text='{}'",
        module_path,
        span.detector_name.as_deref().unwrap_or("-"),
        span.kind,
        span.document_id,
        span.begin,
        span.end,
        get_loggable_content(&span.text)
    );
}

/// Stable hash of a span value, normalized for case and whitespace.
pub fn canonical_sample_hash(kind: &str, snippet: &str) -> String {
    let normalized = snippet
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}
