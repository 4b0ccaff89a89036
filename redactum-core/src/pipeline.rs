// File: redactum-core/src/pipeline.rs

//! pipeline.rs - Applies the registered transforms to the full span list.

use log::debug;

use crate::errors::Result;
use crate::registry::TransformRegistry;
use crate::span::Span;

#[derive(Debug, Clone, Copy)]
pub struct TransformPipeline<'a> {
    transforms: &'a TransformRegistry,
}

impl<'a> TransformPipeline<'a> {
    pub fn new(transforms: &'a TransformRegistry) -> Self {
        Self { transforms }
    }

    /// Folds the transforms over `spans` in registration order. The first
    /// failure aborts the whole pass.
    pub fn apply(&self, spans: Vec<Span>) -> Result<Vec<Span>> {
        self.transforms.iter().try_fold(spans, |spans, transform| {
            debug!("Applying transform '{}' to {} spans.", transform.name(), spans.len());
            transform.process(spans)
        })
    }
}
