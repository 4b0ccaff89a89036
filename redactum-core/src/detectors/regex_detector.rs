// redactum-core/src/detectors/regex_detector.rs
//! A `Detector` that yields one span per match of a configured regex rule,
//! optionally filtered by a programmatic validator.
//! License: MIT OR APACHE 2.0

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use strip_ansi_escapes::strip;

use crate::config::{RegexRule, MAX_PATTERN_LENGTH};
use crate::errors::{Result, ScrubError};
use crate::plugin::{Detector, Plugin, SpanIter};
use crate::span::Span;
use crate::validators::Validator;

lazy_static! {
    /// Compiled patterns keyed by a hash of the rule, shared by every detector
    /// built from an identical rule.
    static ref COMPILED_RULES_CACHE: RwLock<HashMap<u64, Arc<Regex>>> = RwLock::new(HashMap::new());
}

fn hash_rule(rule: &RegexRule) -> u64 {
    let mut hasher = DefaultHasher::new();
    rule.hash(&mut hasher);
    hasher.finish()
}

/// Compiles the rule's pattern, or returns the cached compilation.
pub fn get_or_compile_rule(rule: &RegexRule) -> Result<Arc<Regex>> {
    let cache_key = hash_rule(rule);
    {
        let cache = COMPILED_RULES_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(regex) = cache.get(&cache_key) {
            debug!("Serving compiled rule '{}' from cache.", rule.name);
            return Ok(Arc::clone(regex));
        }
    }

    let pattern = rule
        .pattern
        .as_deref()
        .ok_or_else(|| ScrubError::Config(format!("Rule '{}' is missing the `pattern` field.", rule.name)))?;
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(ScrubError::PatternLengthExceeded(rule.name.clone(), pattern.len(), MAX_PATTERN_LENGTH));
    }

    let regex = RegexBuilder::new(pattern)
        .multi_line(rule.multiline)
        .dot_matches_new_line(rule.dot_matches_new_line)
        .size_limit(10 * (1 << 20))
        .build()
        .map_err(|e| ScrubError::RuleCompilation(rule.name.clone(), e))?;
    debug!("Rule '{}' compiled successfully.", rule.name);

    let regex = Arc::new(regex);
    COMPILED_RULES_CACHE
        .write()
        .unwrap_or_else(|e| e.into_inner())
        .insert(cache_key, Arc::clone(&regex));
    Ok(regex)
}

/// Length in bytes of the escape sequence at the start of `rest`, if any.
///
/// Recognizes CSI (`ESC [` up to a final byte in 0x40..=0x7E), the
/// string sequences OSC, DCS, SOS, PM and APC (terminated by BEL or
/// `ESC \`), and plain `ESC` sequences with optional intermediate bytes.
/// An unterminated sequence runs to the end of the input.
fn escape_sequence_len(rest: &[u8]) -> Option<usize> {
    if rest.first() != Some(&0x1b) {
        return None;
    }
    match rest.get(1) {
        None => Some(1),
        Some(b'[') => Some(
            rest.iter()
                .skip(2)
                .position(|b| (0x40..=0x7e).contains(b))
                .map_or(rest.len(), |i| i + 3),
        ),
        Some(b']' | b'P' | b'X' | b'^' | b'_') => {
            let mut i = 2;
            while i < rest.len() {
                match rest[i] {
                    0x07 => return Some(i + 1),
                    0x1b if rest.get(i + 1) == Some(&b'\\') => return Some(i + 2),
                    _ => i += 1,
                }
            }
            Some(rest.len())
        }
        Some(b) if !b.is_ascii() => Some(1),
        Some(_) => {
            let intermediates = rest[1..].iter().take_while(|b| (0x20..=0x2f).contains(*b)).count();
            Some((intermediates + 2).min(rest.len()))
        }
    }
}

/// Maps byte offsets in ANSI-stripped text back to the original text.
#[derive(Debug)]
struct StrippedIndexMapper {
    /// Original byte offset of every byte of the stripped text.
    map: Vec<usize>,
    original_len: usize,
}

impl StrippedIndexMapper {
    /// Walks `original` past every escape sequence, pairing each visible char
    /// with the next char of `stripped`. Visible chars the stripper dropped
    /// (other control codes) are skipped.
    fn new(original: &str, stripped: &str) -> Self {
        let bytes = original.as_bytes();
        let mut map = Vec::with_capacity(stripped.len());
        let mut pos = 0;
        for stripped_char in stripped.chars() {
            while pos < bytes.len() {
                if let Some(len) = escape_sequence_len(&bytes[pos..]) {
                    pos += len;
                    continue;
                }
                let Some(orig_char) = original[pos..].chars().next() else {
                    break;
                };
                let width = orig_char.len_utf8();
                let start = pos;
                pos += width;
                if orig_char == stripped_char {
                    map.extend(start..pos);
                    break;
                }
            }
        }
        Self { map, original_len: original.len() }
    }

    fn map_begin(&self, stripped_index: usize) -> usize {
        self.map.get(stripped_index).copied().unwrap_or(self.original_len)
    }

    fn map_end(&self, stripped_index: usize) -> usize {
        match stripped_index.checked_sub(1) {
            Some(last) => self.map.get(last).map_or(self.original_len, |i| i + 1),
            None => 0,
        }
    }
}

#[derive(Debug)]
pub struct RegexDetector {
    rule: RegexRule,
    regex: Arc<Regex>,
    validator: Option<Validator>,
}

impl RegexDetector {
    pub fn new(rule: RegexRule) -> Result<Self> {
        let regex = get_or_compile_rule(&rule)?;
        let validator = if rule.programmatic_validation {
            let validator = Validator::for_rule(&rule.name);
            if validator.is_none() {
                warn!(
                    "Rule '{}' requests programmatic validation but no validator exists for it; matches are accepted as-is.",
                    rule.name
                );
            }
            validator
        } else {
            None
        };
        Ok(Self { rule, regex, validator })
    }

    pub fn rule(&self) -> &RegexRule {
        &self.rule
    }

    fn accepts(&self, candidate: &str) -> bool {
        self.validator.map_or(true, |v| v.check(candidate))
    }

    fn span(&self, begin: usize, end: usize, text: &str) -> Span {
        Span::new(begin, end, self.rule.kind(), text).with_detector(self.rule.name.as_str())
    }

    fn spans_over_stripped(&self, text: &str) -> Vec<Span> {
        let stripped_bytes = strip(text.as_bytes());
        let stripped = String::from_utf8_lossy(&stripped_bytes);
        let mapper = StrippedIndexMapper::new(text, &stripped);
        self.regex
            .find_iter(&stripped)
            .filter(|m| self.accepts(m.as_str()))
            .map(|m| {
                let begin = mapper.map_begin(m.start());
                let end = mapper.map_end(m.end()).max(begin);
                self.span(begin, end, text.get(begin..end).unwrap_or(m.as_str()))
            })
            .collect()
    }
}

impl Plugin for RegexDetector {
    fn name(&self) -> &str {
        &self.rule.name
    }
}

impl Detector for RegexDetector {
    fn iter_spans<'a>(&'a self, text: &'a str, _document_id: Option<&'a str>) -> SpanIter<'a> {
        if self.rule.strip_ansi {
            return Box::new(self.spans_over_stripped(text).into_iter());
        }
        Box::new(
            self.regex
                .find_iter(text)
                .filter(move |m| self.accepts(m.as_str()))
                .map(move |m| self.span(m.start(), m.end(), m.as_str())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(detector: &RegexDetector, text: &str) -> Vec<(usize, usize, String)> {
        detector
            .iter_spans(text, None)
            .map(|s| (s.begin, s.end, s.text))
            .collect()
    }

    #[test]
    fn test_matches_become_spans() -> Result<()> {
        let rule = RegexRule { kind: Some("digits".to_string()), ..RegexRule::new("numbers", r"\d+") };
        let detector = RegexDetector::new(rule)?;
        assert_eq!(
            spans(&detector, "a1 b22"),
            vec![(1, 2, "1".to_string()), (4, 6, "22".to_string())]
        );
        let first = detector.iter_spans("7", None).next().unwrap();
        assert_eq!(first.kind, "digits");
        assert_eq!(first.detector_name.as_deref(), Some("numbers"));
        Ok(())
    }

    #[test]
    fn test_programmatic_validation_filters_matches() -> Result<()> {
        let rule = RegexRule {
            programmatic_validation: true,
            ..RegexRule::new("credit_card", r"\b(?:\d[ -]?){12,18}\d\b")
        };
        let detector = RegexDetector::new(rule)?;
        let found = spans(&detector, "good 4111 1111 1111 1111 bad 4111 1111 1111 1112");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].2, "4111 1111 1111 1111");
        Ok(())
    }

    #[test]
    fn test_strip_ansi_maps_offsets_to_original() -> Result<()> {
        let rule = RegexRule { strip_ansi: true, ..RegexRule::new("secret", "hunter2") };
        let detector = RegexDetector::new(rule)?;
        let text = "pw: \x1b[31mhun\x1b[0mter2!";
        let found = spans(&detector, text);
        assert_eq!(found.len(), 1);
        let (begin, end, _) = &found[0];
        assert_eq!(&text[*begin..*end], "hun\x1b[0mter2");
        Ok(())
    }

    #[test]
    fn test_strip_ansi_span_skips_sgr_parameters() -> Result<()> {
        let rule = RegexRule { strip_ansi: true, ..RegexRule::new("pin", r"\d{4}") };
        let detector = RegexDetector::new(rule)?;

        let text = "\x1b[31m3199\x1b[0m";
        let found = spans(&detector, text);
        assert_eq!(found, vec![(5, 9, "3199".to_string())]);

        let text = "pin \x1b[38;5;99m9999\x1b[0m";
        let found = spans(&detector, text);
        assert_eq!(found, vec![(14, 18, "9999".to_string())]);
        Ok(())
    }

    #[test]
    fn test_strip_ansi_clean_keeps_escape_codes_intact() -> Result<()> {
        let rule = RegexRule { strip_ansi: true, ..RegexRule::new("pin", r"\d{4}") };
        let mut scrubber = crate::scrubber::Scrubber::empty();
        scrubber.add_detector(Box::new(RegexDetector::new(rule)?))?;
        let clean = scrubber.clean("pin \x1b[38;5;99m9999\x1b[0m", &crate::options::CleanOptions::default())?;
        assert_eq!(clean, "pin \x1b[38;5;99m{{PIN}}\x1b[0m");
        Ok(())
    }

    #[test]
    fn test_strip_ansi_skips_osc_sequences() -> Result<()> {
        let rule = RegexRule { strip_ansi: true, ..RegexRule::new("pin", r"\d{4}") };
        let detector = RegexDetector::new(rule)?;
        let text = "\x1b]0;1234\x07pin 5678 \x1b]8;;http://h/4321\x1b\\x\x1b]8;;\x1b\\";
        let found = spans(&detector, text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].2, "5678");
        Ok(())
    }

    #[test]
    fn test_escape_sequence_len() {
        assert_eq!(escape_sequence_len(b"abc"), None);
        assert_eq!(escape_sequence_len(b"\x1b[38;5;99mX"), Some(10));
        assert_eq!(escape_sequence_len(b"\x1b]0;title\x07X"), Some(10));
        assert_eq!(escape_sequence_len(b"\x1b]0;t\x1b\\X"), Some(7));
        assert_eq!(escape_sequence_len(b"\x1b(BX"), Some(3));
        assert_eq!(escape_sequence_len(b"\x1b[31"), Some(4));
        assert_eq!(escape_sequence_len(b"\x1b"), Some(1));
    }

    #[test]
    fn test_invalid_pattern_is_compilation_error() {
        let err = RegexDetector::new(RegexRule::new("bad", "(")).unwrap_err();
        assert!(matches!(err, ScrubError::RuleCompilation(..)));
    }

    #[test]
    fn test_overlong_pattern_rejected() {
        let err = RegexDetector::new(RegexRule::new("long", "a".repeat(MAX_PATTERN_LENGTH + 1))).unwrap_err();
        assert!(matches!(err, ScrubError::PatternLengthExceeded(..)));
    }
}
