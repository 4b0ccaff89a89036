//! Detector implementations shipped with the library.
//!
//! The orchestration core never depends on these; they exist so the default
//! catalog has real entries. Each rule in the configuration becomes one
//! `RegexDetector`.

pub mod regex_detector;

pub use regex_detector::RegexDetector;
