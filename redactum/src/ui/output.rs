// redactum/src/ui/output.rs
//! Table rendering for scan summaries and the catalog listing.
//!
//! Colour is applied only when the caller says the writer is a terminal, so
//! piped output stays plain.

use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use owo_colors::OwoColorize;

use redactum_core::{CatalogEntry, SpanSummaryItem};

fn header<W: Write>(writer: &mut W, title: &str, color: bool) -> io::Result<()> {
    if color {
        writeln!(writer, "{}", title.bold().cyan())
    } else {
        writeln!(writer, "{}", title)
    }
}

fn table(columns: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns.to_vec());
    table
}

/// Prints one row per span kind, or a short notice when nothing was found.
pub fn print_summary<W: Write>(writer: &mut W, summary: &[SpanSummaryItem], color: bool) -> io::Result<()> {
    if summary.is_empty() {
        return writeln!(writer, "No sensitive spans detected.");
    }

    header(writer, "Detected spans", color)?;
    let mut rows = table(&["Kind", "Occurrences", "Detectors", "Documents"]);
    for item in summary {
        let documents = item
            .documents
            .iter()
            .map(|(id, count)| format!("{} ({})", id, count))
            .collect::<Vec<_>>()
            .join(", ");
        rows.add_row(vec![
            item.kind.clone(),
            item.occurrences.to_string(),
            item.detectors.join(", "),
            documents,
        ]);
    }
    writeln!(writer, "{}", rows)?;

    let total: usize = summary.iter().map(|i| i.occurrences).sum();
    writeln!(writer, "Total: {}", total)
}

/// Prints every catalog entry with its plugin kind and autoload flag.
pub fn print_catalog<'a, W, I>(writer: &mut W, entries: I, color: bool) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    header(writer, "Catalog", color)?;
    let mut rows = table(&["Name", "Type", "Autoload", "Index"]);
    for entry in entries {
        rows.add_row(vec![
            entry.name.clone(),
            entry.factory.kind().to_string(),
            if entry.autoload { "yes" } else { "no" }.to_string(),
            entry.index.to_string(),
        ]);
    }
    writeln!(writer, "{}", rows)
}
