// File: redactum-core/src/scrubber.rs

//! scrubber.rs - The orchestrator tying detectors, merging, transforms and
//! reconstruction together.
//!
//! A [`Scrubber`] owns one [`DetectorRegistry`] and one [`TransformRegistry`]
//! and is otherwise stateless between calls. Every `clean` call runs a single
//! pipeline:
//!
//! ```text
//! collect -> merge -> transforms -> rebuild
//! ```
//!
//! Registries are only mutated through `&mut self`, so a scrubber shared
//! across threads must be wrapped in external synchronization (for example a
//! `RwLock`) by callers that also want to add or remove plugins.
//!
//! License: MIT OR Apache-2.0

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;

use crate::catalog::Catalog;
use crate::collector::{SpanCollector, SpanStream};
use crate::config::ScrubberConfig;
use crate::documents::Documents;
use crate::errors::Result;
use crate::merger::{merge_spans, sort_spans};
use crate::options::CleanOptions;
use crate::pipeline::TransformPipeline;
use crate::plugin::{Detector, PluginSpec, Transform};
use crate::reconstruct::rebuild;
use crate::registry::{DetectorRegistry, TransformRegistry};
use crate::span::Span;

/// Whether span iteration runs the transform pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpanMode {
    /// Merged spans only, produced document by document as the stream is
    /// consumed.
    #[default]
    Streaming,
    /// Merged and transformed spans; the whole set is materialized first.
    Batch,
}

impl From<bool> for SpanMode {
    /// `true` means "run transforms".
    fn from(run_transforms: bool) -> Self {
        if run_transforms {
            SpanMode::Batch
        } else {
            SpanMode::Streaming
        }
    }
}

/// Configures the initial plugin sets of a [`Scrubber`].
///
/// Lists left unset default to the catalog's autoload entries; transforms are
/// then ordered by their catalog index.
pub struct ScrubberBuilder {
    catalog: Arc<Catalog>,
    detectors: Option<Vec<PluginSpec<dyn Detector>>>,
    transforms: Option<Vec<PluginSpec<dyn Transform>>>,
}

impl ScrubberBuilder {
    pub fn detectors<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PluginSpec<dyn Detector>>,
    {
        self.detectors = Some(specs.into_iter().map(Into::into).collect());
        self
    }

    pub fn transforms<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PluginSpec<dyn Transform>>,
    {
        self.transforms = Some(specs.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<Scrubber> {
        let catalog = self.catalog;

        let mut detectors = DetectorRegistry::new();
        match self.detectors {
            Some(specs) => {
                for spec in specs {
                    detectors.add_spec(&catalog, spec)?;
                }
            }
            None => {
                for name in catalog.autoload_detectors() {
                    detectors.add_named(&catalog, name)?;
                }
            }
        }

        let mut transforms = TransformRegistry::new();
        match self.transforms {
            Some(specs) => {
                for spec in specs {
                    transforms.add_spec(&catalog, spec, None)?;
                }
            }
            None => {
                for name in catalog.autoload_transforms() {
                    transforms.add_named(&catalog, name, None)?;
                }
            }
        }

        debug!(
            "Scrubber built with detectors {:?} and transforms {:?}.",
            detectors.names(),
            transforms.names()
        );
        Ok(Scrubber { catalog, detectors, transforms })
    }
}

#[derive(Debug)]
pub struct Scrubber {
    catalog: Arc<Catalog>,
    detectors: DetectorRegistry,
    transforms: TransformRegistry,
}

impl Scrubber {
    pub fn builder(catalog: Arc<Catalog>) -> ScrubberBuilder {
        ScrubberBuilder { catalog, detectors: None, transforms: None }
    }

    /// A scrubber holding every autoload entry of `catalog`.
    pub fn new(catalog: Arc<Catalog>) -> Result<Self> {
        Self::builder(catalog).build()
    }

    /// A scrubber with no plugins and an empty catalog.
    pub fn empty() -> Self {
        Self {
            catalog: Catalog::empty(),
            detectors: DetectorRegistry::new(),
            transforms: TransformRegistry::new(),
        }
    }

    /// Builds the catalog from `config` and selects the configured plugins.
    pub fn from_config(config: &ScrubberConfig) -> Result<Self> {
        let mut builder = Self::builder(Catalog::from_config(config)?);
        if let Some(names) = &config.detectors {
            builder = builder.detectors(names.iter().map(String::as_str));
        }
        if let Some(names) = &config.transforms {
            builder = builder.transforms(names.iter().map(String::as_str));
        }
        builder.build()
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn detectors(&self) -> &DetectorRegistry {
        &self.detectors
    }

    pub fn transforms(&self) -> &TransformRegistry {
        &self.transforms
    }

    pub fn add_detector(&mut self, detector: Box<dyn Detector>) -> Result<()> {
        self.detectors.add(detector)
    }

    pub fn add_detector_default<D: Detector + Default + 'static>(&mut self) -> Result<()> {
        self.detectors.add_default::<D>()
    }

    pub fn add_detector_named(&mut self, name: &str) -> Result<()> {
        self.detectors.add_named(&self.catalog, name)
    }

    pub fn remove_detector(&mut self, name: &str) -> Result<Box<dyn Detector>> {
        self.detectors.remove(name)
    }

    pub fn remove_detector_default<D: Detector + Default + 'static>(&mut self) -> Result<Box<dyn Detector>> {
        self.detectors.remove_default::<D>()
    }

    /// Inserts at `index`, or appends when `index` is `None`.
    pub fn add_transform(&mut self, transform: Box<dyn Transform>, index: Option<usize>) -> Result<()> {
        self.transforms.add(transform, index)
    }

    pub fn add_transform_default<T: Transform + Default + 'static>(&mut self, index: Option<usize>) -> Result<()> {
        self.transforms.add_default::<T>(index)
    }

    pub fn add_transform_named(&mut self, name: &str, index: Option<usize>) -> Result<()> {
        self.transforms.add_named(&self.catalog, name, index)
    }

    pub fn remove_transform(&mut self, name: &str) -> Option<Box<dyn Transform>> {
        self.transforms.remove(name)
    }

    pub fn remove_transform_default<T: Transform + Default + 'static>(&mut self) -> Option<Box<dyn Transform>> {
        self.transforms.remove_default::<T>()
    }

    fn collector(&self) -> SpanCollector<'_> {
        SpanCollector::new(&self.detectors)
    }

    /// Merges, transforms and re-sorts a complete span set.
    fn finish(&self, spans: Vec<Span>) -> Result<Vec<Span>> {
        let merged = merge_spans(spans);
        let mut transformed = TransformPipeline::new(&self.transforms).apply(merged)?;
        sort_spans(&mut transformed);
        Ok(transformed)
    }

    /// Redacts a single document.
    pub fn clean(&self, text: &str, options: &CleanOptions) -> Result<String> {
        options.warn_deprecated();
        let spans = self.collector().collect(text, None, None).collect::<Result<Vec<_>>>()?;
        let spans = self.finish(spans)?;
        debug!("Rebuilding document with {} spans.", spans.len());
        Ok(rebuild(text, &spans, None, options))
    }

    /// Redacts every document of a batch. The transform pass sees the spans
    /// of all documents at once; the output has the shape of the input.
    pub fn clean_documents(&self, documents: &Documents, options: &CleanOptions) -> Result<Documents> {
        options.warn_deprecated();
        let spans = self.collector().collect_many(documents)?;
        let spans = self.finish(spans)?;

        let mut by_document: HashMap<&str, Vec<&Span>> = HashMap::new();
        for span in &spans {
            if let Some(id) = span.document_id.as_deref() {
                by_document.entry(id).or_default().push(span);
            }
        }

        let outputs: Vec<String> = documents
            .iter()
            .map(|(id, text)| {
                let own = by_document.get(id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                rebuild(text, own.iter().copied(), None, options)
            })
            .collect();
        debug!("Cleaned {} documents.", outputs.len());
        Ok(documents.same_shape(outputs))
    }

    /// Exposes the spans `clean` would replace in `text`.
    ///
    /// In [`SpanMode::Streaming`] nothing runs until the stream is first
    /// polled, and transforms are skipped. In [`SpanMode::Batch`] the full
    /// pipeline up to reconstruction runs before this returns.
    pub fn iter_spans<'a>(
        &'a self,
        text: &'a str,
        document_id: Option<&'a str>,
        mode: impl Into<SpanMode>,
        exclude: Option<&'a HashSet<String>>,
    ) -> Result<SpanStream<'a>> {
        let collector = self.collector();
        match mode.into() {
            SpanMode::Streaming => Ok(deferred(move || {
                let spans = collector.collect(text, document_id, exclude).collect::<Result<Vec<_>>>()?;
                Ok(merge_spans(spans))
            })),
            SpanMode::Batch => {
                let spans = collector.collect(text, document_id, exclude).collect::<Result<Vec<_>>>()?;
                let spans = self.finish(spans)?;
                Ok(Box::new(spans.into_iter().map(Ok)))
            }
        }
    }

    /// Exposes the spans `clean_documents` would replace, in document order.
    ///
    /// In [`SpanMode::Streaming`] batch-capable detectors run once up front;
    /// every other detector runs per document as the stream reaches it, and
    /// each document's spans are merged on their own.
    pub fn iter_spans_documents<'a>(
        &'a self,
        documents: &'a Documents,
        mode: impl Into<SpanMode>,
    ) -> Result<SpanStream<'a>> {
        let collector = self.collector();
        match mode.into() {
            SpanMode::Streaming => {
                let (joint, handled) = collector.collect_documents_jointly(documents)?;
                let mut joint_by_document: HashMap<String, Vec<Span>> = HashMap::new();
                for span in joint {
                    let id = span.document_id.clone().unwrap_or_default();
                    joint_by_document.entry(id).or_default().push(span);
                }

                Ok(Box::new(documents.iter().flat_map(move |(id, text)| {
                    let mut spans = joint_by_document.remove(&id).unwrap_or_default();
                    match collector.collect_owned(text, &id, &handled) {
                        Ok(own) => {
                            spans.extend(own);
                            merge_spans(spans).into_iter().map(Ok).collect::<Vec<_>>()
                        }
                        Err(e) => vec![Err(e)],
                    }
                })))
            }
            SpanMode::Batch => {
                let spans = self.finish(collector.collect_many(documents)?)?;
                Ok(Box::new(spans.into_iter().map(Ok)))
            }
        }
    }
}

/// A stream that runs `produce` on first poll and yields its spans, or its
/// error once.
fn deferred<'a, F>(produce: F) -> SpanStream<'a>
where
    F: FnOnce() -> Result<Vec<Span>> + 'a,
{
    Box::new(std::iter::once_with(produce).flat_map(|result| match result {
        Ok(spans) => spans.into_iter().map(Ok).collect::<Vec<_>>(),
        Err(e) => vec![Err(e)],
    }))
}
