// File: redactum-core/src/catalog.rs

//! catalog.rs - The immutable name → constructor registry.
//!
//! A `Catalog` maps plugin names to constructors plus default-inclusion
//! metadata (`autoload`, and an `index` that orders autoloaded transforms).
//! It is built once with a `CatalogBuilder`, frozen, and shared by `Arc`
//! with every scrubber that needs to resolve names; there is no ambient
//! global catalog.
//!
//! License: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::config::{RegexRule, ScrubberConfig};
use crate::detectors::regex_detector::RegexDetector;
use crate::errors::{Result, ScrubError};
use crate::plugin::{Detector, Transform};
use crate::transforms::{KindReplacer, PrefixSuffixReplacer, TokenReplacer};

pub type DetectorFactory = Arc<dyn Fn() -> Result<Box<dyn Detector>> + Send + Sync>;
pub type TransformFactory = Arc<dyn Fn() -> Result<Box<dyn Transform>> + Send + Sync>;

/// What a catalog entry constructs.
#[derive(Clone)]
pub enum Factory {
    Detector(DetectorFactory),
    Transform(TransformFactory),
}

impl Factory {
    pub fn kind(&self) -> &'static str {
        match self {
            Factory::Detector(_) => "detector",
            Factory::Transform(_) => "transform",
        }
    }
}

#[derive(Clone)]
pub struct CatalogEntry {
    pub name: String,
    /// Included when a scrubber is built without an explicit plugin list.
    pub autoload: bool,
    /// Position among autoloaded transforms; ignored for detectors.
    pub index: i32,
    pub factory: Factory,
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("name", &self.name)
            .field("kind", &self.factory.kind())
            .field("autoload", &self.autoload)
            .field("index", &self.index)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entries: BTreeMap<String, CatalogEntry>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, entry: CatalogEntry) -> Result<&mut Self> {
        if self.entries.contains_key(&entry.name) {
            return Err(ScrubError::DuplicateName {
                plugin: "catalog entry",
                name: entry.name,
            });
        }
        debug!(
            "Registering {} '{}' in catalog (autoload={}).",
            entry.factory.kind(),
            entry.name,
            entry.autoload
        );
        self.entries.insert(entry.name.clone(), entry);
        Ok(self)
    }

    pub fn detector<F>(&mut self, name: impl Into<String>, autoload: bool, factory: F) -> Result<&mut Self>
    where
        F: Fn() -> Result<Box<dyn Detector>> + Send + Sync + 'static,
    {
        self.register(CatalogEntry {
            name: name.into(),
            autoload,
            index: 0,
            factory: Factory::Detector(Arc::new(factory)),
        })
    }

    pub fn transform<F>(
        &mut self,
        name: impl Into<String>,
        autoload: bool,
        index: i32,
        factory: F,
    ) -> Result<&mut Self>
    where
        F: Fn() -> Result<Box<dyn Transform>> + Send + Sync + 'static,
    {
        self.register(CatalogEntry {
            name: name.into(),
            autoload,
            index,
            factory: Factory::Transform(Arc::new(factory)),
        })
    }

    /// Registers one regex rule as a detector entry; opt-in rules are not autoloaded.
    pub fn rule(&mut self, rule: RegexRule) -> Result<&mut Self> {
        let name = rule.name.clone();
        let autoload = !rule.opt_in && rule.enabled.unwrap_or(true);
        self.detector(name, autoload, move || {
            Ok(Box::new(RegexDetector::new(rule.clone())?) as Box<dyn Detector>)
        })
    }

    /// Registers the transforms shipped with the library.
    pub fn builtin_transforms(&mut self) -> Result<&mut Self> {
        self.transform(KindReplacer::NAME, false, 0, || {
            Ok(Box::new(KindReplacer::default()) as Box<dyn Transform>)
        })?
        .transform(TokenReplacer::NAME, false, 0, || {
            Ok(Box::new(TokenReplacer::default()) as Box<dyn Transform>)
        })?
        .transform(PrefixSuffixReplacer::NAME, false, 1, || {
            Ok(Box::new(PrefixSuffixReplacer::default()) as Box<dyn Transform>)
        })
    }

    pub fn build(self) -> Arc<Catalog> {
        Arc::new(Catalog { entries: self.entries })
    }
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// An empty catalog: every name lookup fails with `UnknownIdentifier`.
    pub fn empty() -> Arc<Catalog> {
        Arc::new(Catalog::default())
    }

    /// The embedded default rules plus the built-in transforms.
    pub fn builtin() -> Result<Arc<Catalog>> {
        Catalog::from_config(&ScrubberConfig::load_default_rules()?)
    }

    /// One detector entry per configured rule, plus the built-in transforms.
    /// A token transform configured under `token` replaces the default one.
    pub fn from_config(config: &ScrubberConfig) -> Result<Arc<Catalog>> {
        let mut builder = CatalogBuilder::new();
        for rule in &config.rules {
            builder.rule(rule.clone())?;
        }
        builder.builtin_transforms()?;
        if let Some(token) = config.token.clone() {
            TokenReplacer::from_config(&token)?;
            builder.entries.remove(TokenReplacer::NAME);
            builder.transform(TokenReplacer::NAME, false, 0, move || {
                Ok(Box::new(TokenReplacer::from_config(&token)?) as Box<dyn Transform>)
            })?;
        }
        Ok(builder.build())
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Constructs the detector registered under `name`.
    pub fn detector(&self, name: &str) -> Result<Box<dyn Detector>> {
        let entry = self.get(name).ok_or_else(|| ScrubError::UnknownIdentifier {
            plugin: "detector",
            name: name.to_string(),
        })?;
        match &entry.factory {
            Factory::Detector(factory) => factory(),
            other => Err(ScrubError::TypeConstraintViolation {
                name: name.to_string(),
                expected: "detector",
                found: other.kind(),
            }),
        }
    }

    /// Constructs the transform registered under `name`.
    pub fn transform(&self, name: &str) -> Result<Box<dyn Transform>> {
        let entry = self.get(name).ok_or_else(|| ScrubError::UnknownIdentifier {
            plugin: "transform",
            name: name.to_string(),
        })?;
        match &entry.factory {
            Factory::Transform(factory) => factory(),
            other => Err(ScrubError::TypeConstraintViolation {
                name: name.to_string(),
                expected: "transform",
                found: other.kind(),
            }),
        }
    }

    /// Names of autoloaded detectors, in name order.
    pub fn autoload_detectors(&self) -> Vec<&str> {
        self.entries
            .values()
            .filter(|e| e.autoload && matches!(e.factory, Factory::Detector(_)))
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Names of autoloaded transforms, ordered by catalog index then name.
    pub fn autoload_transforms(&self) -> Vec<&str> {
        let mut entries: Vec<&CatalogEntry> = self
            .entries
            .values()
            .filter(|e| e.autoload && matches!(e.factory, Factory::Transform(_)))
            .collect();
        entries.sort_by_key(|e| e.index);
        entries.into_iter().map(|e| e.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{Plugin, SpanIter};

    #[derive(Default)]
    struct Nothing;

    impl Plugin for Nothing {
        fn name(&self) -> &str {
            "nothing"
        }
    }

    impl Detector for Nothing {
        fn iter_spans<'a>(&'a self, _text: &'a str, _document_id: Option<&'a str>) -> SpanIter<'a> {
            Box::new(std::iter::empty())
        }
    }

    #[test]
    fn test_unknown_name_is_unknown_identifier() {
        let catalog = Catalog::empty();
        assert!(matches!(
            catalog.detector("missing"),
            Err(ScrubError::UnknownIdentifier { .. })
        ));
    }

    #[test]
    fn test_wrong_kind_is_type_constraint_violation() {
        let mut builder = Catalog::builder();
        builder.builtin_transforms().unwrap();
        let catalog = builder.build();
        assert!(matches!(
            catalog.detector(KindReplacer::NAME),
            Err(ScrubError::TypeConstraintViolation { expected: "detector", .. })
        ));
    }

    #[test]
    fn test_duplicate_catalog_entry_rejected() {
        let mut builder = Catalog::builder();
        builder
            .detector("nothing", true, || Ok(Box::new(Nothing) as Box<dyn Detector>))
            .unwrap();
        let err = builder
            .detector("nothing", true, || Ok(Box::new(Nothing) as Box<dyn Detector>))
            .unwrap_err();
        assert!(matches!(err, ScrubError::DuplicateName { .. }));
    }

    #[test]
    fn test_autoload_transforms_ordered_by_index() {
        let mut builder = Catalog::builder();
        builder
            .transform("late", true, 5, || Ok(Box::new(KindReplacer::default()) as Box<dyn Transform>))
            .unwrap()
            .transform("early", true, -1, || Ok(Box::new(KindReplacer::default()) as Box<dyn Transform>))
            .unwrap()
            .transform("hidden", false, 0, || Ok(Box::new(KindReplacer::default()) as Box<dyn Transform>))
            .unwrap();
        let catalog = builder.build();
        assert_eq!(catalog.autoload_transforms(), vec!["early", "late"]);
    }

    #[test]
    fn test_builtin_catalog_autoloads_default_rules() -> Result<()> {
        let catalog = Catalog::builtin()?;
        let autoload = catalog.autoload_detectors();
        assert!(autoload.contains(&"email"));
        assert!(autoload.contains(&"credit_card"));
        assert!(!autoload.contains(&"uk_nino"));
        assert!(catalog.autoload_transforms().is_empty());
        Ok(())
    }
}
