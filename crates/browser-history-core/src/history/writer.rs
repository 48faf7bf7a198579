use super::types::OutputEntry;
use crate::{OutputFormat, Result};
use std::io::Write;

pub struct HistoryWriter;

impl HistoryWriter {
    /// Write entries to the given sink in the requested format
    pub fn write<W: Write>(
        entries: &[OutputEntry],
        format: OutputFormat,
        pretty: bool,
        out: &mut W,
    ) -> Result<()> {
        tracing::debug!("Writing {} history entries as {}", entries.len(), format.as_str());

        match format {
            OutputFormat::Json => writeln!(out, "{}", Self::to_json(entries, pretty)?)?,
            OutputFormat::Text => out.write_all(Self::to_text(entries).as_bytes())?,
        }

        Ok(())
    }

    /// Render entries as a JSON array
    pub fn to_json(entries: &[OutputEntry], pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(entries)?
        } else {
            serde_json::to_string(entries)?
        };

        Ok(json)
    }

    /// Render entries as fixed-width text lines
    pub fn to_text(entries: &[OutputEntry]) -> String {
        if entries.is_empty() {
            return "No history entries found.\n".to_string();
        }

        let mut text = String::new();
        for entry in entries {
            text.push_str(&Self::text_line(entry));
            text.push('\n');
        }
        text
    }

    fn text_line(entry: &OutputEntry) -> String {
        format!(
            "{:<30} {:<50} ({}) [{}] [{}] [{}] [{}]",
            entry.timestamp,
            entry.display_title(),
            entry.url,
            entry.visit_count,
            entry.typed,
            entry.visit_type,
            entry.browser
        )
    }
}
