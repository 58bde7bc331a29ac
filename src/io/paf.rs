use std::io::BufRead;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;

use super::FormatError;
use crate::chimera::{AlignmentRecord, AlignmentSet, Strand};

const PAF_COLUMNS: usize = 12;

struct PendingContig {
    query_len: u32,
    records: Vec<AlignmentRecord>,
}

fn field<T: FromStr>(
    fields: &[&str],
    idx: usize,
    line: usize,
    name: &str,
) -> Result<T, FormatError> {
    fields[idx].parse().map_err(|_| {
        FormatError::parse("PAF", line, format!("invalid {name} '{}'", fields[idx]))
    })
}

/// Read PAF alignments, grouped per query contig in first-seen order.
///
/// Only the 12 mandatory columns are used; optional tags are ignored. The
/// alignment length is the block length (column 11).
pub fn read_paf<R: BufRead>(reader: R) -> Result<Vec<AlignmentSet>, FormatError> {
    let mut contigs: IndexMap<String, PendingContig> = IndexMap::new();
    let mut references: IndexMap<String, Arc<str>> = IndexMap::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < PAF_COLUMNS {
            return Err(FormatError::parse(
                "PAF",
                line_no,
                format!("expected {PAF_COLUMNS} columns, found {}", fields.len()),
            ));
        }

        let query_len: u32 = field(&fields, 1, line_no, "query length")?;
        let query_start: u32 = field(&fields, 2, line_no, "query start")?;
        let query_end: u32 = field(&fields, 3, line_no, "query end")?;
        let strand: Strand = fields[4]
            .parse()
            .map_err(|message: String| FormatError::parse("PAF", line_no, message))?;
        let ref_start: u32 = field(&fields, 7, line_no, "target start")?;
        let ref_end: u32 = field(&fields, 8, line_no, "target end")?;
        let aln_len: u32 = field(&fields, 10, line_no, "block length")?;

        let reference = references
            .entry(fields[5].to_string())
            .or_insert_with(|| Arc::from(fields[5]));
        let record = AlignmentRecord::new(
            Arc::clone(reference),
            (ref_start, ref_end),
            (query_start, query_end),
            aln_len,
            strand,
        );

        let pending = contigs
            .entry(fields[0].to_string())
            .or_insert_with(|| PendingContig {
                query_len,
                records: Vec::new(),
            });
        if pending.query_len != query_len {
            return Err(FormatError::parse(
                "PAF",
                line_no,
                format!(
                    "query {} has length {query_len}, earlier records say {}",
                    fields[0], pending.query_len
                ),
            ));
        }
        pending.records.push(record);
    }

    contigs
        .into_iter()
        .map(|(contig, pending)| {
            AlignmentSet::new(contig, pending.query_len, pending.records).map_err(Into::into)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAF: &str = "\
ctgA\t1000\t0\t600\t+\tchr1\t50000\t100\t700\t590\t600\t60
ctgB\t500\t0\t500\t-\tchr2\t80000\t1000\t1500\t480\t500\t60
ctgA\t1000\t600\t1000\t+\tchr2\t80000\t2000\t2400\t400\t400\t60\ttp:A:P
";

    #[test]
    fn groups_by_contig_in_first_seen_order() {
        let sets = read_paf(PAF.as_bytes()).unwrap();
        assert_eq!(sets.len(), 2);

        let a = &sets[0];
        assert_eq!(a.contig(), "ctgA");
        assert_eq!(a.query_len(), 1000);
        assert_eq!(a.len(), 2);
        assert_eq!(a.records()[1].reference.as_ref(), "chr2");
        assert_eq!(a.records()[1].aln_len, 400);

        assert_eq!(sets[1].records()[0].strand, Strand::Reverse);
    }

    #[test]
    fn short_lines_are_rejected() {
        let err = read_paf("ctgA\t1000\t0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, FormatError::Parse { line: 1, .. }));
    }

    #[test]
    fn inconsistent_query_length_is_rejected() {
        let paf = "\
ctgA\t1000\t0\t600\t+\tchr1\t50000\t100\t700\t590\t600\t60
ctgA\t900\t600\t900\t+\tchr2\t80000\t2000\t2300\t300\t300\t60
";
        let err = read_paf(paf.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn bad_strand_is_rejected() {
        let paf = "ctgA\t1000\t0\t600\t?\tchr1\t50000\t100\t700\t590\t600\t60\n";
        let err = read_paf(paf.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("unknown strand"));
    }
}
