// redactum/src/commands/clean.rs
//! `redactum clean`: writes the cleaned input to stdout.

use std::io::{self, Write};

use anyhow::{Context, Result};
use log::info;

use redactum_core::Documents;

use super::{build_scrubber, read_input, Input};
use crate::cli::CleanCommand;

pub fn run_clean(cmd: &CleanCommand) -> Result<()> {
    info!("Starting redactum clean.");
    let (scrubber, options) = build_scrubber(&cmd.input)?;
    let input = read_input(&cmd.input)?;

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    match input {
        Input::Text(text) => {
            let clean = scrubber.clean(&text, &options).context("Cleaning failed")?;
            write!(writer, "{}", clean)?;
        }
        Input::Documents(documents) => {
            let clean = scrubber
                .clean_documents(&documents, &options)
                .context("Cleaning failed")?;
            write_documents(&mut writer, &clean, cmd.input.json)?;
        }
    }
    writer.flush()?;
    info!("Redactum clean completed.");
    Ok(())
}

/// Writes cleaned documents as JSON, as a single body, or as one
/// `==> name <==` section per document.
pub fn write_documents<W: Write>(writer: &mut W, documents: &Documents, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *writer, documents).context("Failed to serialize documents")?;
        writeln!(writer)?;
        return Ok(());
    }

    if documents.len() == 1 {
        if let Some((_, text)) = documents.iter().next() {
            write!(writer, "{}", text)?;
        }
        return Ok(());
    }

    for (name, text) in documents.iter() {
        writeln!(writer, "==> {} <==", name)?;
        write!(writer, "{}", text)?;
        if !text.ends_with('\n') {
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(documents: &Documents, json: bool) -> String {
        let mut out = Vec::new();
        write_documents(&mut out, documents, json).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_single_document_is_written_plainly() {
        assert_eq!(render(&Documents::from([("a.txt", "body\n")]), false), "body\n");
    }

    #[test]
    fn test_multiple_documents_get_headers() {
        let out = render(&Documents::from([("a", "one"), ("b", "two\n")]), false);
        assert_eq!(out, "==> a <==\none\n==> b <==\ntwo\n");
    }

    #[test]
    fn test_json_keeps_shape() {
        let out = render(&Documents::from(vec!["x", "y"]), true);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value, serde_json::json!(["x", "y"]));
    }
}
