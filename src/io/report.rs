use std::io::Write;

use anyhow::{anyhow, Result};

use crate::BreakReport;

const HEADER: &str = "#contig\tkind\tpieces\tborders\n";

/// Write one tab-separated line per broken contig.
pub fn write_breaks<W: Write>(writer: &mut W, reports: &[BreakReport]) -> Result<()> {
    writer.write_all(HEADER.as_bytes())?;

    for report in reports {
        let borders: Vec<String> = report.borders.iter().map(ToString::to_string).collect();
        let line = format!(
            "{contig}\t{kind}\t{pieces}\t{borders}\n",
            contig = report.contig,
            kind = report.kind,
            pieces = report.borders.len(),
            borders = borders.join(","),
        );
        writer.write_all(line.as_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

/// Render the break report into a string (useful for tests and snapshots).
pub fn render_breaks(reports: &[BreakReport]) -> Result<String> {
    let mut buffer = Vec::new();
    write_breaks(&mut buffer, reports)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered report is not valid UTF-8"))
}
