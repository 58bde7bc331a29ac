use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::{AlignmentRecord, AlignmentSet, Borders, Strand};

/// Thresholds for intrachromosomal breakpoint detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntraThresholds {
    /// Minimum alignment length to consider.
    pub min_len: u32,
    /// Largest tolerated jump between consecutive alignments on the reference.
    pub max_ref_gap: u64,
    /// Largest tolerated jump between consecutive alignments on the contig.
    pub max_query_gap: u64,
}

/// Reference receiving the most summed alignment length.
///
/// Ties go to the reference seen first.
pub fn best_reference(alignments: &AlignmentSet) -> Option<Arc<str>> {
    let mut totals: IndexMap<&str, (u64, &Arc<str>)> = IndexMap::new();
    for record in alignments.records() {
        let entry = totals
            .entry(record.reference.as_ref())
            .or_insert((0, &record.reference));
        entry.0 += u64::from(record.aln_len);
    }

    let mut best: Option<(u64, &Arc<str>)> = None;
    for (_, (total, reference)) in totals {
        if best.map_or(true, |(best_total, _)| total > best_total) {
            best = Some((total, reference));
        }
    }
    best.map(|(_, reference)| Arc::clone(reference))
}

/// Longest alignment by block length; the lowest index wins ties.
pub fn longest_alignment(alignments: &AlignmentSet) -> Option<&AlignmentRecord> {
    let mut longest: Option<&AlignmentRecord> = None;
    for record in alignments.records() {
        if longest.map_or(true, |l| record.aln_len > l.aln_len) {
            longest = Some(record);
        }
    }
    longest
}

/// Index of the first maximum.
fn first_max(values: &[u64]) -> Option<(usize, u64)> {
    let mut best: Option<(usize, u64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if best.map_or(true, |(_, max)| value > max) {
            best = Some((idx, value));
        }
    }
    best
}

/// Look for a single misjoin within the best-matching chromosome.
///
/// Alignments to the best reference are walked in reference order. A jump
/// on the reference larger than `max_ref_gap` cuts the contig at the lower
/// query coordinate of the alignment before the jump; failing that, a jump
/// on the contig larger than `max_query_gap` cuts at the first alignment's
/// query start. When the contig maps mostly in reverse, query start and end
/// trade roles throughout.
///
/// Returns `None` when nothing exceeds the thresholds or no alignment
/// survives filtering. At most one cut is made per call.
pub fn find_intrachromosomal_break(
    alignments: &AlignmentSet,
    thresholds: &IntraThresholds,
) -> Option<Borders> {
    let best = best_reference(alignments)?;
    let candidates = alignments
        .with_references(&[best.as_ref()])
        .with_min_length(thresholds.min_len);
    if candidates.is_empty() {
        debug!(contig = alignments.contig(), "no alignments left after filtering");
        return None;
    }

    let records = candidates.records();
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&idx| (records[idx].ref_start, records[idx].ref_end, idx));

    let reverse = longest_alignment(&candidates)?.strand == Strand::Reverse;
    let (starts, ends): (Vec<u32>, Vec<u32>) = order
        .iter()
        .map(|&idx| {
            let record = &records[idx];
            if reverse {
                (record.query_end, record.query_start)
            } else {
                (record.query_start, record.query_end)
            }
        })
        .unzip();

    let ref_gaps: Vec<u64> = order
        .windows(2)
        .map(|pair| u64::from(records[pair[1]].ref_start - records[pair[0]].ref_start))
        .collect();
    let query_gaps: Vec<u64> = starts
        .windows(2)
        .map(|pair| u64::from(pair[1].abs_diff(pair[0])))
        .collect();

    let cut = match (first_max(&ref_gaps), first_max(&query_gaps)) {
        (Some((idx, gap)), _) if gap > thresholds.max_ref_gap => {
            debug!(contig = alignments.contig(), gap, "reference jump");
            starts[idx].min(ends[idx])
        }
        (_, Some((_, gap))) if gap > thresholds.max_query_gap => {
            debug!(contig = alignments.contig(), gap, "contig jump");
            starts[0]
        }
        _ => return None,
    };

    let borders = Borders::from_breakpoints(candidates.query_len(), [cut]);
    if !borders.is_split() {
        debug!(
            contig = alignments.contig(),
            cut, "cut falls on a contig end, leaving it whole"
        );
        return None;
    }
    Some(borders)
}
