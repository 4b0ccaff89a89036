// redactum/src/ui/mod.rs
//! Terminal rendering helpers.

pub mod output;
