// redactum-core/src/plugin.rs
//! Defines the `Detector` and `Transform` traits and the ways a caller can
//! name a plugin when constructing or mutating a scrubber.
//!
//! Both traits are the seams of the pipeline: detectors produce spans,
//! transforms rewrite the complete span list. Neither knows about the other.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;

use crate::documents::Documents;
use crate::errors::Result;
use crate::span::Span;

/// Lazy, finite sequence of spans.
pub type SpanIter<'a> = Box<dyn Iterator<Item = Span> + 'a>;

/// Common identity shared by detectors and transforms.
pub trait Plugin: Send + Sync {
    /// Unique name within one scrubber.
    fn name(&self) -> &str;
}

/// A span producer.
///
/// Implementations must be pure functions of their input: the same text
/// always yields the same spans, and no state is shared across calls.
pub trait Detector: Plugin {
    /// Produces spans for one document. `document_id` is `None` in the
    /// single-document case; the collector re-tags every span regardless.
    fn iter_spans<'a>(&'a self, text: &'a str, document_id: Option<&'a str>) -> SpanIter<'a>;

    /// Produces spans jointly across a whole batch. Detectors that need
    /// cross-document context return `Some`; the collector then skips their
    /// per-document `iter_spans` for that batch.
    fn iter_spans_documents<'a>(&'a self, _documents: &'a Documents) -> Option<SpanIter<'a>> {
        None
    }
}

/// A global rewrite of the span list, applied after merging.
pub trait Transform: Plugin {
    /// Receives every span of the call (all documents) and returns the new list.
    fn process(&self, spans: Vec<Span>) -> Result<Vec<Span>>;
}

/// How a plugin is supplied at construction time.
pub enum PluginSpec<P: ?Sized> {
    /// A ready instance.
    Instance(Box<P>),
    /// A default-constructed instance of a type.
    Default(fn() -> Box<P>),
    /// A name resolved against the catalog.
    Named(String),
}

impl<P: ?Sized> PluginSpec<P> {
    pub fn named(name: impl Into<String>) -> Self {
        PluginSpec::Named(name.into())
    }
}

impl PluginSpec<dyn Detector> {
    pub fn instance<D: Detector + 'static>(detector: D) -> Self {
        PluginSpec::Instance(Box::new(detector))
    }

    pub fn of<D: Detector + Default + 'static>() -> Self {
        PluginSpec::Default(|| -> Box<dyn Detector> { Box::new(D::default()) })
    }
}

impl PluginSpec<dyn Transform> {
    pub fn instance<T: Transform + 'static>(transform: T) -> Self {
        PluginSpec::Instance(Box::new(transform))
    }

    pub fn of<T: Transform + Default + 'static>() -> Self {
        PluginSpec::Default(|| -> Box<dyn Transform> { Box::new(T::default()) })
    }
}

impl<P: ?Sized + Plugin> fmt::Debug for PluginSpec<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginSpec::Instance(p) => write!(f, "Instance({})", p.name()),
            PluginSpec::Default(_) => write!(f, "Default"),
            PluginSpec::Named(name) => write!(f, "Named({})", name),
        }
    }
}

impl<P: ?Sized> From<&str> for PluginSpec<P> {
    fn from(name: &str) -> Self {
        PluginSpec::Named(name.to_string())
    }
}

impl<P: ?Sized> From<String> for PluginSpec<P> {
    fn from(name: String) -> Self {
        PluginSpec::Named(name)
    }
}
