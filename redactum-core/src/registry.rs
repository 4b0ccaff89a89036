// File: redactum-core/src/registry.rs

//! registry.rs - Ordered, uniquely-named plugin registries.
//!
//! `DetectorRegistry` keeps detectors in insertion order. `TransformRegistry`
//! keeps transforms in an index-addressable sequence whose order is the order
//! they are applied in. Both reject a second plugin with an existing name.
//!
//! License: MIT OR Apache-2.0

use std::fmt;

use log::debug;

use crate::catalog::Catalog;
use crate::errors::{Result, ScrubError};
use crate::plugin::{Detector, Plugin, PluginSpec, Transform};

pub struct Registry<P: ?Sized> {
    plugin: &'static str,
    entries: Vec<Box<P>>,
}

pub type DetectorRegistry = Registry<dyn Detector>;
pub type TransformRegistry = Registry<dyn Transform>;

impl<P: ?Sized + Plugin> Registry<P> {
    fn with_label(plugin: &'static str) -> Self {
        Self { plugin, entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|p| p.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&P> {
        self.entries.iter().find(|p| p.name() == name).map(|p| &**p)
    }

    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.entries.iter().map(|p| &**p)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|p| p.name()).collect()
    }

    /// Inserts at `index` (clamped to the current length) or appends.
    fn insert_checked(&mut self, plugin: Box<P>, index: Option<usize>) -> Result<()> {
        let name = plugin.name().to_string();
        if self.contains(&name) {
            return Err(ScrubError::DuplicateName { plugin: self.plugin, name });
        }
        match index {
            Some(i) => {
                let i = i.min(self.entries.len());
                debug!("Inserting {} '{}' at position {}.", self.plugin, name, i);
                self.entries.insert(i, plugin);
            }
            None => {
                debug!("Appending {} '{}'.", self.plugin, name);
                self.entries.push(plugin);
            }
        }
        Ok(())
    }

    /// Drops the first plugin named `name`.
    fn take(&mut self, name: &str) -> Option<Box<P>> {
        let pos = self.entries.iter().position(|p| p.name() == name)?;
        debug!("Removing {} '{}'.", self.plugin, name);
        Some(self.entries.remove(pos))
    }
}

impl<P: ?Sized + Plugin> fmt::Debug for Registry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("plugin", &self.plugin)
            .field("names", &self.names())
            .finish()
    }
}

impl Default for Registry<dyn Detector> {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry<dyn Detector> {
    pub fn new() -> Self {
        Self::with_label("detector")
    }

    pub fn add(&mut self, detector: Box<dyn Detector>) -> Result<()> {
        self.insert_checked(detector, None)
    }

    pub fn add_default<D: Detector + Default + 'static>(&mut self) -> Result<()> {
        self.add(Box::new(D::default()))
    }

    pub fn add_named(&mut self, catalog: &Catalog, name: &str) -> Result<()> {
        let detector = catalog.detector(name)?;
        self.add(detector)
    }

    pub fn add_spec(&mut self, catalog: &Catalog, spec: PluginSpec<dyn Detector>) -> Result<()> {
        match spec {
            PluginSpec::Instance(detector) => self.add(detector),
            PluginSpec::Default(construct) => self.add(construct()),
            PluginSpec::Named(name) => self.add_named(catalog, &name),
        }
    }

    /// Removes the detector named `name`; an absent name is an error.
    pub fn remove(&mut self, name: &str) -> Result<Box<dyn Detector>> {
        self.take(name).ok_or_else(|| ScrubError::UnknownIdentifier {
            plugin: "detector",
            name: name.to_string(),
        })
    }

    pub fn remove_default<D: Detector + Default + 'static>(&mut self) -> Result<Box<dyn Detector>> {
        let probe = D::default();
        self.remove(probe.name())
    }
}

impl Default for Registry<dyn Transform> {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry<dyn Transform> {
    pub fn new() -> Self {
        Self::with_label("transform")
    }

    pub fn add(&mut self, transform: Box<dyn Transform>, index: Option<usize>) -> Result<()> {
        self.insert_checked(transform, index)
    }

    pub fn add_default<T: Transform + Default + 'static>(&mut self, index: Option<usize>) -> Result<()> {
        self.add(Box::new(T::default()), index)
    }

    pub fn add_named(&mut self, catalog: &Catalog, name: &str, index: Option<usize>) -> Result<()> {
        let transform = catalog.transform(name)?;
        self.add(transform, index)
    }

    pub fn add_spec(
        &mut self,
        catalog: &Catalog,
        spec: PluginSpec<dyn Transform>,
        index: Option<usize>,
    ) -> Result<()> {
        match spec {
            PluginSpec::Instance(transform) => self.add(transform, index),
            PluginSpec::Default(construct) => self.add(construct(), index),
            PluginSpec::Named(name) => self.add_named(catalog, &name, index),
        }
    }

    /// Drops the first transform named `name`; absent names are ignored.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Transform>> {
        self.take(name)
    }

    pub fn remove_default<T: Transform + Default + 'static>(&mut self) -> Option<Box<dyn Transform>> {
        let probe = T::default();
        self.remove(probe.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::SpanIter;
    use crate::span::Span;

    struct Named(&'static str);

    impl Plugin for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    impl Detector for Named {
        fn iter_spans<'a>(&'a self, _text: &'a str, _document_id: Option<&'a str>) -> SpanIter<'a> {
            Box::new(std::iter::empty())
        }
    }

    impl Transform for Named {
        fn process(&self, spans: Vec<Span>) -> Result<Vec<Span>> {
            Ok(spans)
        }
    }

    #[test]
    fn test_detector_duplicate_then_remove_and_readd() {
        let mut registry = DetectorRegistry::new();
        registry.add(Box::new(Named("a"))).unwrap();
        let err = registry.add(Box::new(Named("a"))).unwrap_err();
        assert!(matches!(err, ScrubError::DuplicateName { plugin: "detector", .. }));
        registry.remove("a").unwrap();
        registry.add(Box::new(Named("a"))).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_detector_iteration_is_insertion_order() {
        let mut registry = DetectorRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.add(Box::new(Named(name))).unwrap();
        }
        assert_eq!(registry.names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_remove_missing_detector_is_unknown_identifier() {
        let mut registry = DetectorRegistry::new();
        assert!(matches!(
            registry.remove("ghost"),
            Err(ScrubError::UnknownIdentifier { .. })
        ));
    }

    #[test]
    fn test_transform_index_insertion() {
        let mut registry = TransformRegistry::new();
        registry.add(Box::new(Named("a")), None).unwrap();
        registry.add(Box::new(Named("c")), None).unwrap();
        registry.add(Box::new(Named("b")), Some(1)).unwrap();
        registry.add(Box::new(Named("first")), Some(0)).unwrap();
        registry.add(Box::new(Named("last")), Some(99)).unwrap();
        assert_eq!(registry.names(), vec!["first", "a", "b", "c", "last"]);
    }

    #[test]
    fn test_transform_remove_is_lenient() {
        let mut registry = TransformRegistry::new();
        registry.add(Box::new(Named("a")), None).unwrap();
        assert!(registry.remove("missing").is_none());
        assert!(registry.remove("a").is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_transform_duplicate_rejected() {
        let mut registry = TransformRegistry::new();
        registry.add(Box::new(Named("a")), None).unwrap();
        assert!(matches!(
            registry.add(Box::new(Named("a")), Some(0)),
            Err(ScrubError::DuplicateName { plugin: "transform", .. })
        ));
    }
}
