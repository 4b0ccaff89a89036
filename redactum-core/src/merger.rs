// File: redactum-core/src/merger.rs

//! merger.rs - Canonical ordering and merging of overlapping spans.
//!
//! Spans are ordered by document (unnamed first, then named ids
//! lexicographically), then by `begin`, with the longer span first on equal
//! `begin`. Within a document, a span whose `begin` is at or before the
//! running span's `end` is absorbed into it; exactly touching spans merge.
//!
//! License: MIT OR Apache-2.0

use std::cmp::Ordering;

use log::debug;

use crate::span::Span;

/// Total order used before merging. Kind and detector name break ties so the
/// result does not depend on detector registration order.
pub fn compare_spans(a: &Span, b: &Span) -> Ordering {
    a.sort_key()
        .cmp(&b.sort_key())
        .then_with(|| a.kind.cmp(&b.kind))
        .then_with(|| a.detector_name.cmp(&b.detector_name))
}

pub fn sort_spans(spans: &mut [Span]) {
    spans.sort_by(compare_spans);
}

/// Sorts and merges `spans` into a non-overlapping list, per document.
pub fn merge_spans(spans: Vec<Span>) -> Vec<Span> {
    let input_len = spans.len();
    let merged: Vec<Span> = MergeIter::sorted(spans).collect();
    debug!("Merged {} spans into {}.", input_len, merged.len());
    merged
}

/// Lazily merges an already sorted span sequence.
#[derive(Debug)]
pub struct MergeIter<I: Iterator<Item = Span>> {
    inner: I,
    current: Option<Span>,
}

impl<I: Iterator<Item = Span>> MergeIter<I> {
    /// `inner` must be ordered by [`compare_spans`].
    pub fn new(inner: I) -> Self {
        Self { inner, current: None }
    }
}

impl MergeIter<std::vec::IntoIter<Span>> {
    pub fn sorted(mut spans: Vec<Span>) -> Self {
        sort_spans(&mut spans);
        Self::new(spans.into_iter())
    }
}

impl<I: Iterator<Item = Span>> Iterator for MergeIter<I> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        let mut current = self.current.take().or_else(|| self.inner.next())?;
        for next in self.inner.by_ref() {
            if next.document_id != current.document_id || current.end < next.begin {
                self.current = Some(next);
                return Some(current);
            }
            current = current.merged_with(&next);
        }
        Some(current)
    }
}
