use std::io::{BufRead, Write};

use anyhow::{anyhow, Result};

use super::FormatError;
use crate::chimera::{Feature, FeatureStore};

const GFF_COLUMNS: usize = 9;

/// Annotation file split into its leading directives and per-sequence features.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GffDocument {
    /// Comment and directive lines preceding the first feature.
    pub header: Vec<String>,
    /// Features grouped by sequence name, in file order.
    pub features: FeatureStore,
}

/// Read a GFF file into 0-based half-open features.
///
/// Columns other than sequence name, start and end are kept verbatim in
/// [`Feature::payload`]. Reading stops at a `##FASTA` directive.
pub fn read_gff<R: BufRead>(reader: R) -> Result<GffDocument, FormatError> {
    let mut document = GffDocument::default();
    let mut seen_feature = false;

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line?;
        if line.starts_with("##FASTA") {
            break;
        }
        if line.starts_with('#') {
            if !seen_feature {
                document.header.push(line);
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != GFF_COLUMNS {
            return Err(FormatError::parse(
                "GFF",
                line_no,
                format!("expected {GFF_COLUMNS} columns, found {}", fields.len()),
            ));
        }

        let start: u32 = fields[3]
            .parse()
            .map_err(|_| {
                FormatError::parse("GFF", line_no, format!("invalid start '{}'", fields[3]))
            })?;
        let end: u32 = fields[4]
            .parse()
            .map_err(|_| {
                FormatError::parse("GFF", line_no, format!("invalid end '{}'", fields[4]))
            })?;
        if start == 0 || end < start - 1 {
            return Err(FormatError::parse(
                "GFF",
                line_no,
                format!("invalid feature span {start}..{end}"),
            ));
        }

        let payload = [1, 2, 5, 6, 7, 8]
            .iter()
            .map(|&idx| fields[idx].to_string())
            .collect();
        let feature = Feature::new(fields[0], start - 1, end, payload);

        seen_feature = true;
        document
            .features
            .entry(feature.seqname.clone())
            .or_default()
            .push(feature);
    }

    Ok(document)
}

/// Write a document back out with 1-based inclusive coordinates.
pub fn write_gff<W: Write>(writer: &mut W, document: &GffDocument) -> Result<()> {
    for line in &document.header {
        writeln!(writer, "{line}")?;
    }

    for feature in document.features.values().flatten() {
        let [source, kind, score, strand, phase, attributes] = feature.payload.as_slice() else {
            return Err(anyhow!(
                "feature {}:{}-{} has {} payload columns, expected 6",
                feature.seqname,
                feature.start,
                feature.end,
                feature.payload.len()
            ));
        };
        writeln!(
            writer,
            "{}\t{source}\t{kind}\t{}\t{}\t{score}\t{strand}\t{phase}\t{attributes}",
            feature.seqname,
            feature.start + 1,
            feature.end
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Render a document into a string (useful for tests and snapshots).
pub fn render_gff(document: &GffDocument) -> Result<String> {
    let mut buffer = Vec::new();
    write_gff(&mut buffer, document)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered GFF is not valid UTF-8"))
}
