use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::{AlignmentSet, ChimeraError, Interval};

/// Union length of reference bases covered on one chromosome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCoverage {
    /// Reference chromosome name.
    pub reference: Arc<str>,
    /// Number of distinct reference bases touched by the contig.
    pub covered: u64,
}

/// Length of the union of `intervals`.
///
/// Sorts the slice by start and sweeps once, counting only the part of each
/// interval that lies past the furthest end seen so far.
pub fn union_length(intervals: &mut [Interval]) -> u64 {
    intervals.sort_unstable_by_key(|interval| interval.start);

    let mut covered = 0u64;
    let mut max_end = 0u32;
    for interval in intervals.iter() {
        let new_start = interval.start.max(max_end);
        covered += u64::from(interval.end.saturating_sub(new_start));
        max_end = max_end.max(interval.end);
    }
    covered
}

/// Covered length per reference, in order of first appearance.
///
/// Alignments shorter than `min_len` are ignored.
pub fn reference_coverage(alignments: &AlignmentSet, min_len: u32) -> Vec<ReferenceCoverage> {
    let mut by_reference: IndexMap<Arc<str>, Vec<Interval>> = IndexMap::new();
    for record in alignments
        .records()
        .iter()
        .filter(|record| record.aln_len >= min_len)
    {
        by_reference
            .entry(Arc::clone(&record.reference))
            .or_default()
            .push(record.reference_interval());
    }

    by_reference
        .into_iter()
        .map(|(reference, mut intervals)| ReferenceCoverage {
            covered: union_length(&mut intervals),
            reference,
        })
        .collect()
}

/// References the contig aligns to significantly.
///
/// A reference qualifies when its covered length exceeds `min_percent` of
/// the total covered length across all references *and* exceeds
/// `min_bases`. Fails with [`ChimeraError::InsufficientCoverage`] when no
/// alignment of at least `min_len` remains.
pub fn significant_references(
    alignments: &AlignmentSet,
    min_len: u32,
    min_percent: f64,
    min_bases: u64,
) -> Result<Vec<Arc<str>>, ChimeraError> {
    let coverage = reference_coverage(alignments, min_len);
    let total: u64 = coverage.iter().map(|c| c.covered).sum();
    if total == 0 {
        return Err(ChimeraError::InsufficientCoverage {
            contig: alignments.contig().to_string(),
        });
    }

    let significant: Vec<Arc<str>> = coverage
        .into_iter()
        .filter(|c| {
            let percent = c.covered as f64 / total as f64 * 100.0;
            percent > min_percent && c.covered > min_bases
        })
        .map(|c| c.reference)
        .collect();

    debug!(
        contig = alignments.contig(),
        total,
        significant = ?significant,
        "scored reference coverage"
    );
    Ok(significant)
}
