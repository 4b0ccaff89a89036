// File: redactum-core/src/summary.rs

//! summary.rs - Aggregate reporting over detected spans.
//!
//! Summaries never carry the matched text, only counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// Occurrences of one span kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpanSummaryItem {
    pub kind: String,
    pub occurrences: usize,
    /// Producers that contributed spans of this kind.
    pub detectors: Vec<String>,
    /// Occurrences per document id; empty for single-document input.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub documents: BTreeMap<String, usize>,
}

/// Groups `spans` by kind, ordered by kind name.
pub fn summarize<'s, I>(spans: I) -> Vec<SpanSummaryItem>
where
    I: IntoIterator<Item = &'s Span>,
{
    let mut by_kind: BTreeMap<&str, SpanSummaryItem> = BTreeMap::new();
    for span in spans {
        let item = by_kind.entry(span.kind.as_str()).or_insert_with(|| SpanSummaryItem {
            kind: span.kind.clone(),
            ..Default::default()
        });
        item.occurrences += 1;
        for name in span.detector_names() {
            if !item.detectors.iter().any(|d| d == name) {
                item.detectors.push(name.to_string());
            }
        }
        if let Some(id) = &span.document_id {
            *item.documents.entry(id.clone()).or_insert(0) += 1;
        }
    }

    by_kind
        .into_values()
        .map(|mut item| {
            item.detectors.sort();
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_groups_by_kind_and_document() {
        let spans = vec![
            Span::new(0, 1, "email", "a").with_detector("email").with_document(Some("1")),
            Span::new(2, 3, "url", "b").with_detector("url").with_document(Some("1")),
            Span::new(0, 1, "email", "c").with_detector("email").with_document(Some("2")),
        ];
        let summary = summarize(&spans);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].kind, "email");
        assert_eq!(summary[0].occurrences, 2);
        assert_eq!(summary[0].detectors, vec!["email".to_string()]);
        assert_eq!(summary[0].documents.get("2"), Some(&1));
        assert_eq!(summary[1].kind, "url");
    }

    #[test]
    fn test_empty_summary() {
        let spans: Vec<Span> = Vec::new();
        assert!(summarize(&spans).is_empty());
    }
}
