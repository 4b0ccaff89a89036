// redactum/src/commands/scan.rs
//! `redactum scan`: reports what would be redacted without redacting it.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use log::info;

use redactum_core::{summarize, Span, SpanMode};

use super::{build_scrubber, read_input, Input};
use crate::cli::ScanCommand;
use crate::ui::output;

pub fn run_scan(cmd: &ScanCommand) -> Result<()> {
    info!("Starting redactum scan.");
    let (scrubber, _options) = build_scrubber(&cmd.input)?;
    let input = read_input(&cmd.input)?;

    let spans: Vec<Span> = match &input {
        Input::Text(text) => scrubber
            .iter_spans(text, None, SpanMode::Streaming, None)?
            .collect::<redactum_core::Result<Vec<Span>>>(),
        Input::Documents(documents) => scrubber
            .iter_spans_documents(documents, SpanMode::Streaming)?
            .collect::<redactum_core::Result<Vec<Span>>>(),
    }
    .context("Scanning failed")?;

    let summary = summarize(&spans);
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    if cmd.json_summary {
        serde_json::to_writer_pretty(&mut writer, &summary).context("Failed to serialize summary")?;
        writeln!(writer)?;
    } else {
        let color = io::stdout().is_terminal();
        output::print_summary(&mut writer, &summary, color)?;
    }
    writer.flush()?;

    if let Some(threshold) = cmd.fail_over_threshold {
        if spans.len() > threshold {
            bail!(
                "Detected {} sensitive spans, exceeding the threshold of {}.",
                spans.len(),
                threshold
            );
        }
    }
    Ok(())
}
