use crate::config::OutputFormat;
use anyhow::Result;
use pdf_outline::FlatOutlineEntry;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

pub fn write_flat_outline<W: Write>(
    out: &mut W,
    file: &Path,
    entries: &[FlatOutlineEntry],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "# {}", file.display())?;
            if entries.is_empty() {
                writeln!(out, "No bookmarks pointing at pages.")?;
                return Ok(());
            }
            writeln!(out, "page\tlevel\tspecific\ttitle")?;
            for entry in entries {
                // Levels start at 1; top-level titles are not indented.
                let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
                writeln!(
                    out,
                    "{}\t{}\t{}\t{indent}{}",
                    entry.page,
                    entry.level,
                    if entry.specific_location { "yes" } else { "no" },
                    entry.title
                )?;
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "file": file.display().to_string(),
                "entries": entries,
            });
            serde_json::to_writer(&mut *out, &value)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn write_levels<W: Write>(
    out: &mut W,
    file: &Path,
    levels: &BTreeSet<u32>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let levels = levels
                .iter()
                .map(u32::to_string)
                .collect::<Vec<String>>()
                .join(" ");
            writeln!(out, "{}\t{levels}", file.display())?;
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "file": file.display().to_string(),
                "levels": levels,
            });
            serde_json::to_writer(&mut *out, &value)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
