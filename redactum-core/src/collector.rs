// File: redactum-core/src/collector.rs

//! collector.rs - Runs registered detectors over one or many documents.
//!
//! Every span a detector yields is validated against the text it claims to
//! cover and tagged with the identity of the document it came from. Single
//! document collection stays lazy; batch collection materializes because the
//! merger needs the complete set anyway.
//!
//! License: MIT OR Apache-2.0

use std::collections::HashSet;

use log::debug;

use crate::documents::Documents;
use crate::errors::{Result, ScrubError};
use crate::registry::DetectorRegistry;
use crate::span::{log_span_debug, Span};

/// Lazy sequence of validated spans.
pub type SpanStream<'a> = Box<dyn Iterator<Item = Result<Span>> + 'a>;

#[derive(Debug, Clone, Copy)]
pub struct SpanCollector<'a> {
    detectors: &'a DetectorRegistry,
}

impl<'a> SpanCollector<'a> {
    pub fn new(detectors: &'a DetectorRegistry) -> Self {
        Self { detectors }
    }

    /// Runs every detector not named in `exclude` over `text`, concatenating
    /// their outputs in registration order.
    pub fn collect(
        &self,
        text: &'a str,
        document_id: Option<&'a str>,
        exclude: Option<&'a HashSet<String>>,
    ) -> SpanStream<'a> {
        let detectors = self.detectors;
        Box::new(
            detectors
                .iter()
                .filter(move |d| exclude.map_or(true, |names| !names.contains(d.name())))
                .flat_map(move |detector| {
                    let name = detector.name();
                    detector
                        .iter_spans(text, document_id)
                        .map(move |span| validate_span(span, name, text, document_id))
                }),
        )
    }

    /// Runs the batch-capable detectors once over the whole collection.
    /// Returns their spans and the names of the detectors that handled the batch.
    pub fn collect_documents_jointly(&self, documents: &'a Documents) -> Result<(Vec<Span>, HashSet<String>)> {
        let mut spans = Vec::new();
        let mut names = HashSet::new();

        for detector in self.detectors.iter() {
            let Some(produced) = detector.iter_spans_documents(documents) else {
                continue;
            };
            let name = detector.name();
            debug!("Detector '{}' handles the batch of {} documents jointly.", name, documents.len());
            names.insert(name.to_string());

            for span in produced {
                let document_id = span.document_id.clone().ok_or_else(|| ScrubError::InvalidProducerOutput {
                    detector: name.to_string(),
                    reason: "span produced over a document batch has no document_id".to_string(),
                })?;
                let text = documents.get(&document_id).ok_or_else(|| ScrubError::InvalidProducerOutput {
                    detector: name.to_string(),
                    reason: format!("unknown document_id '{}'", document_id),
                })?;
                spans.push(validate_span(span, name, text, Some(document_id.as_str()))?);
            }
        }

        Ok((spans, names))
    }

    /// Collects raw (unmerged) spans for every document of the batch.
    pub fn collect_many(&self, documents: &'a Documents) -> Result<Vec<Span>> {
        let (mut spans, joint) = self.collect_documents_jointly(documents)?;
        let per_document = self.collect_each(documents, &joint)?;
        spans.extend(per_document.into_iter().flatten());
        debug!("Collected {} spans across {} documents.", spans.len(), documents.len());
        Ok(spans)
    }

    #[cfg(not(feature = "parallel"))]
    fn collect_each(&self, documents: &'a Documents, exclude: &HashSet<String>) -> Result<Vec<Vec<Span>>> {
        documents
            .iter()
            .map(|(id, text)| self.collect_owned(text, &id, exclude))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn collect_each(&self, documents: &'a Documents, exclude: &HashSet<String>) -> Result<Vec<Vec<Span>>> {
        use rayon::prelude::*;

        let batch: Vec<(String, &str)> = documents.iter().collect();
        batch
            .par_iter()
            .map(|(id, text)| self.collect_owned(text, id, exclude))
            .collect()
    }

    /// Eager per-document collection with owned output, skipping `exclude`.
    pub(crate) fn collect_owned(&self, text: &str, document_id: &str, exclude: &HashSet<String>) -> Result<Vec<Span>> {
        self.detectors
            .iter()
            .filter(|d| !exclude.contains(d.name()))
            .flat_map(|detector| {
                let name = detector.name();
                detector
                    .iter_spans(text, Some(document_id))
                    .map(move |span| validate_span(span, name, text, Some(document_id)))
            })
            .collect()
    }
}

/// Checks that `span` addresses a valid slice of `text`, then tags it with
/// its document and fills in the producer name and covered text if missing.
pub(crate) fn validate_span(mut span: Span, detector: &str, text: &str, document_id: Option<&str>) -> Result<Span> {
    let invalid = |reason: String| ScrubError::InvalidProducerOutput {
        detector: detector.to_string(),
        reason,
    };

    if span.begin > span.end {
        return Err(invalid(format!("begin {} is after end {}", span.begin, span.end)));
    }
    if span.end > text.len() {
        return Err(invalid(format!(
            "end {} exceeds document length {}",
            span.end,
            text.len()
        )));
    }
    if !text.is_char_boundary(span.begin) || !text.is_char_boundary(span.end) {
        return Err(invalid(format!(
            "range {}..{} does not fall on character boundaries",
            span.begin, span.end
        )));
    }

    span.document_id = document_id.map(str::to_string);
    if span.detector_name.is_none() {
        span.detector_name = Some(detector.to_string());
    }
    if span.text.is_empty() {
        span.text = text[span.begin..span.end].to_string();
    }
    log_span_debug(module_path!(), &span);
    Ok(span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{Detector, Plugin, SpanIter};

    /// Yields one span per occurrence of a fixed word.
    struct Word(&'static str);

    impl Plugin for Word {
        fn name(&self) -> &str {
            self.0
        }
    }

    impl Detector for Word {
        fn iter_spans<'a>(&'a self, text: &'a str, _document_id: Option<&'a str>) -> SpanIter<'a> {
            Box::new(
                text.match_indices(self.0)
                    .map(move |(i, m)| Span::new(i, i + m.len(), "word", "")),
            )
        }
    }

    struct Broken;

    impl Plugin for Broken {
        fn name(&self) -> &str {
            "broken"
        }
    }

    impl Detector for Broken {
        fn iter_spans<'a>(&'a self, text: &'a str, _document_id: Option<&'a str>) -> SpanIter<'a> {
            Box::new(std::iter::once(Span::new(0, text.len() + 1, "bad", "")))
        }
    }

    /// Finds every occurrence of a word across the batch in one pass.
    struct JointWord(&'static str);

    impl Plugin for JointWord {
        fn name(&self) -> &str {
            "joint"
        }
    }

    impl Detector for JointWord {
        fn iter_spans<'a>(&'a self, _text: &'a str, _document_id: Option<&'a str>) -> SpanIter<'a> {
            panic!("per-document collection must be skipped for batch detectors")
        }

        fn iter_spans_documents<'a>(&'a self, documents: &'a Documents) -> Option<SpanIter<'a>> {
            let word = self.0;
            Some(Box::new(documents.iter().flat_map(move |(id, text)| {
                text.match_indices(word)
                    .map(|(i, m)| Span::new(i, i + m.len(), "joint", m))
                    .collect::<Vec<_>>()
                    .into_iter()
                    .map(move |s| s.with_document(Some(id.as_str())))
            })))
        }
    }

    fn registry(detectors: Vec<Box<dyn Detector>>) -> DetectorRegistry {
        let mut registry = DetectorRegistry::new();
        for d in detectors {
            registry.add(d).unwrap();
        }
        registry
    }

    #[test]
    fn test_collect_tags_document_and_fills_text() {
        let registry = registry(vec![Box::new(Word("cat"))]);
        let collector = SpanCollector::new(&registry);
        let spans: Vec<Span> = collector
            .collect("a cat and a cat", Some("doc"), None)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(spans.len(), 2);
        assert!(spans.iter().all(|s| s.document_id.as_deref() == Some("doc")));
        assert!(spans.iter().all(|s| s.text == "cat"));
        assert!(spans.iter().all(|s| s.detector_name.as_deref() == Some("cat")));
    }

    #[test]
    fn test_collect_respects_exclusions() {
        let registry = registry(vec![Box::new(Word("cat")), Box::new(Word("dog"))]);
        let collector = SpanCollector::new(&registry);
        let exclude: HashSet<String> = ["cat".to_string()].into_iter().collect();
        let spans: Vec<Span> = collector
            .collect("cat dog", None, Some(&exclude))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "dog");
    }

    #[test]
    fn test_out_of_range_span_is_invalid_output() {
        let registry = registry(vec![Box::new(Broken)]);
        let collector = SpanCollector::new(&registry);
        let result: Result<Vec<Span>> = collector.collect("abc", None, None).collect();
        assert!(matches!(result, Err(ScrubError::InvalidProducerOutput { .. })));
    }

    #[test]
    fn test_non_char_boundary_is_invalid_output() {
        let err = validate_span(Span::new(1, 2, "x", ""), "d", "é", None).unwrap_err();
        assert!(matches!(err, ScrubError::InvalidProducerOutput { .. }));
    }

    #[test]
    fn test_collect_many_skips_joint_detectors_per_document() {
        let registry = registry(vec![Box::new(JointWord("cat")), Box::new(Word("dog"))]);
        let collector = SpanCollector::new(&registry);
        let documents = Documents::from(vec!["cat dog", "dog"]);
        let spans = collector.collect_many(&documents).unwrap();
        let joint: Vec<&Span> = spans.iter().filter(|s| s.kind == "joint").collect();
        assert_eq!(joint.len(), 1);
        assert_eq!(joint[0].document_id.as_deref(), Some("0"));
        assert_eq!(spans.iter().filter(|s| s.text == "dog").count(), 2);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_collect_many_matches_sequential_order() {
        let registry = registry(vec![Box::new(Word("cat")), Box::new(Word("dog"))]);
        let collector = SpanCollector::new(&registry);
        let documents = Documents::from(vec!["cat dog", "dog cat cat", "", "dogcat", "no pets", "cat"]);
        let parallel = collector.collect_many(&documents).unwrap();

        let mut sequential = Vec::new();
        for (id, text) in documents.iter() {
            let spans: Vec<Span> = collector
                .collect(text, Some(id.as_str()), None)
                .collect::<Result<_>>()
                .unwrap();
            sequential.extend(spans);
        }
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.len(), 8);
    }
}
