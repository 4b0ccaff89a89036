// File: redactum-core/src/reconstruct.rs

//! reconstruct.rs - Replays a merged span list against the original text.
//!
//! The spans handed to [`rebuild`] must already be sorted and
//! non-overlapping for the document being rebuilt; this is not checked.
//! Offsets outside the text are tolerated (the affected passthrough is
//! dropped) so that a broken caller never panics here.
//!
//! License: MIT OR Apache-2.0

use crate::options::CleanOptions;
use crate::span::Span;

/// Rebuilds `text`, replacing every span that belongs to `document_id`
/// (every span, when `document_id` is `None`).
pub fn rebuild<'s, I>(text: &str, spans: I, document_id: Option<&str>, options: &CleanOptions) -> String
where
    I: IntoIterator<Item = &'s Span>,
{
    let mut clean = String::with_capacity(text.len());
    let mut cursor = 0usize;

    for span in spans
        .into_iter()
        .filter(|s| document_id.is_none() || s.document_id.as_deref() == document_id)
    {
        clean.push_str(text.get(cursor..span.begin).unwrap_or(""));
        match &span.fixed_replacement {
            Some(replacement) => clean.push_str(replacement),
            None => clean.push_str(&span.replace_with(options)),
        }
        cursor = span.end;
    }

    clean.push_str(text.get(cursor..).unwrap_or(""));
    clean
}
