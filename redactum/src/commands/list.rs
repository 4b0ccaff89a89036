// redactum/src/commands/list.rs
//! `redactum list`: prints the catalog.

use std::io::{self, Write};

use anyhow::{Context, Result};
use is_terminal::IsTerminal;

use redactum_core::Catalog;

use super::load_config;
use crate::cli::ListCommand;
use crate::ui::output;

pub fn run_list(cmd: &ListCommand) -> Result<()> {
    let config = load_config(cmd.config.as_deref())?;
    let catalog = Catalog::from_config(&config).context("Failed to build catalog")?;
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    output::print_catalog(&mut writer, catalog.entries(), io::stdout().is_terminal())?;
    writer.flush()?;
    Ok(())
}
