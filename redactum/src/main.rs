// redactum/src/main.rs
//! Redactum entry point.
//!
//! Parses arguments, initialises logging and dispatches to a command.

use anyhow::Result;
use clap::Parser;

use redactum::cli::{Cli, Commands};
use redactum::commands;
use redactum::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));

    match cli.command {
        Commands::Clean(cmd) => commands::clean::run_clean(&cmd),
        Commands::Scan(cmd) => commands::scan::run_scan(&cmd),
        Commands::List(cmd) => commands::list::run_list(&cmd),
    }
}
