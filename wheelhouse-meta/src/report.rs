//! Report rendering and delivery

use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::inventory::InventoryRow;
use crate::Result;

/// Separator between rows of a TSV report
pub const ROW_TERMINATOR: &str = "\r\n";

/// Output format of the inventory report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Tsv,
    Json,
}

/// Replace characters that would break the TSV layout
fn sanitize(value: &str) -> String {
    value
        .split(['\t', '\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn tsv_line<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    fields
        .into_iter()
        .map(sanitize)
        .collect::<Vec<_>>()
        .join("\t")
}

/// Render rows as tab-separated lines joined by CRLF.
pub fn render_tsv(rows: &[InventoryRow], header: bool) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    if header {
        lines.push(tsv_line(InventoryRow::COLUMNS));
    }
    lines.extend(rows.iter().map(|row| tsv_line(row.fields())));
    lines.join(ROW_TERMINATOR)
}

/// Render rows as a pretty JSON array
pub fn render_json(rows: &[InventoryRow]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Render the report in the requested format
pub fn render(rows: &[InventoryRow], format: ReportFormat, header: bool) -> Result<String> {
    match format {
        ReportFormat::Tsv => Ok(render_tsv(rows, header)),
        ReportFormat::Json => render_json(rows),
    }
}

/// Write rendered report text; every sink receives the same bytes.
fn write_report<W: Write>(mut writer: W, text: &str) -> Result<()> {
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write the report to `output`, or stdout when `None`.
///
/// Rows are separated by [`ROW_TERMINATOR`] with none after the last row.
/// Returns `false` without writing anything when there are no rows.
pub fn deliver(
    rows: &[InventoryRow],
    format: ReportFormat,
    header: bool,
    output: Option<&Path>,
) -> Result<bool> {
    if rows.is_empty() {
        info!("No packages found, nothing to report");
        return Ok(false);
    }

    let text = render(rows, format, header)?;

    match output {
        Some(path) => {
            write_report(File::create(path)?, &text)?;
            info!("Wrote {} packages to {:?}", rows.len(), path);
        }
        None => {
            write_report(std::io::stdout().lock(), &text)?;
            info!("Reported {} packages", rows.len());
        }
    }

    Ok(true)
}
