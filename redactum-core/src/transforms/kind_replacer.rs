// File: redactum-core/src/transforms/kind_replacer.rs

use crate::errors::Result;
use crate::plugin::{Plugin, Transform};
use crate::span::Span;

/// Replaces every span with its kind, e.g. `EMAIL`.
#[derive(Debug, Clone)]
pub struct KindReplacer {
    pub uppercase: bool,
}

impl KindReplacer {
    pub const NAME: &'static str = "kind_replacer";
}

impl Default for KindReplacer {
    fn default() -> Self {
        Self { uppercase: true }
    }
}

impl Plugin for KindReplacer {
    fn name(&self) -> &str {
        Self::NAME
    }
}

impl Transform for KindReplacer {
    fn process(&self, spans: Vec<Span>) -> Result<Vec<Span>> {
        Ok(spans
            .into_iter()
            .map(|mut span| {
                let kind = if self.uppercase { span.kind.to_uppercase() } else { span.kind.clone() };
                span.fixed_replacement = Some(kind);
                span
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sets_kind_as_replacement() {
        let out = KindReplacer::default()
            .process(vec![Span::new(0, 3, "email+name", "x")])
            .unwrap();
        assert_eq!(out[0].fixed_replacement.as_deref(), Some("EMAIL+NAME"));
    }
}
