// redactum/src/logger.rs
//! Logger initialisation for the CLI.
//!
//! `--quiet` turns logging off, `--debug` forces debug level; otherwise
//! `RUST_LOG` applies, defaulting to warnings only. Logs go to stderr so
//! they never mix with cleaned output.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Resolves the level requested by the global flags. `None` defers to `RUST_LOG`.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}

/// Installs the global logger. Safe to call more than once; later calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).try_init().ok();
}
