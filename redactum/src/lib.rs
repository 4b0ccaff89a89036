// redactum/src/lib.rs
//! # Redactum CLI Application
//!
//! This crate provides the command-line interface over `redactum-core`:
//! argument parsing, logger setup, input loading and the `clean`, `scan`
//! and `list` commands.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
