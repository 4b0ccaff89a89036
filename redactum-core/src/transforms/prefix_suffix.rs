// File: redactum-core/src/transforms/prefix_suffix.rs

use crate::errors::Result;
use crate::plugin::{Plugin, Transform};
use crate::span::Span;

/// Wraps the current replacement in a prefix and suffix. Spans without a
/// fixed replacement are wrapped around their upper-cased kind.
#[derive(Debug, Clone)]
pub struct PrefixSuffixReplacer {
    pub prefix: String,
    pub suffix: String,
}

impl PrefixSuffixReplacer {
    pub const NAME: &'static str = "prefix_suffix";

    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), suffix: suffix.into() }
    }
}

impl Default for PrefixSuffixReplacer {
    fn default() -> Self {
        Self::new("{{", "}}")
    }
}

impl Plugin for PrefixSuffixReplacer {
    fn name(&self) -> &str {
        Self::NAME
    }
}

impl Transform for PrefixSuffixReplacer {
    fn process(&self, spans: Vec<Span>) -> Result<Vec<Span>> {
        Ok(spans
            .into_iter()
            .map(|mut span| {
                let inner = span
                    .fixed_replacement
                    .take()
                    .unwrap_or_else(|| span.kind.to_uppercase());
                span.fixed_replacement = Some(format!("{}{}{}", self.prefix, inner, self.suffix));
                span
            })
            .collect())
    }
}
