use tracing::debug;

use super::{AlignmentSet, Borders};

/// Alignment indices sorted by query position.
///
/// Ties on query start fall back to query end, then input index.
pub fn query_order(alignments: &AlignmentSet) -> Vec<usize> {
    let records = alignments.records();
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&idx| (records[idx].query_start, records[idx].query_end, idx));
    order
}

/// Positions in `ordered_refs` where the contig switches chromosome.
///
/// A switch at `i` is confirmed only when both `ordered_refs[i]` and the
/// following entry differ from the chromosome currently being walked, so
/// a lone alignment to another chromosome does not trigger a split. The
/// final entry is never confirmed, except in a two-alignment contig where
/// it is the only candidate.
pub fn switch_points<S>(ordered_refs: &[S]) -> Vec<usize>
where
    S: AsRef<str>,
{
    let Some(first) = ordered_refs.first() else {
        return Vec::new();
    };

    let mut current = first.as_ref();
    let mut switches = Vec::new();
    for i in 1..ordered_refs.len() {
        let here = ordered_refs[i].as_ref();
        let next_differs = match ordered_refs.get(i + 1) {
            Some(next) => next.as_ref() != current,
            None => ordered_refs.len() == 2,
        };
        if here != current && next_differs {
            switches.push(i);
            current = here;
        }
    }
    switches
}

/// Cut a contig where its alignments switch chromosome.
///
/// Expects `alignments` already restricted to significant references. Each
/// cut lands at the query end of the alignment preceding the switch.
pub fn cluster_contig_alignments(alignments: &AlignmentSet) -> Borders {
    let records = alignments.records();
    let order = query_order(alignments);
    let ordered_refs: Vec<&str> = order
        .iter()
        .map(|&idx| records[idx].reference.as_ref())
        .collect();

    let cuts: Vec<u32> = switch_points(&ordered_refs)
        .into_iter()
        .map(|i| {
            let previous = &records[order[i - 1]];
            debug!(
                contig = alignments.contig(),
                from = previous.reference.as_ref(),
                to = ordered_refs[i],
                at = previous.query_end,
                "chromosome switch"
            );
            previous.query_end
        })
        .collect();

    Borders::from_breakpoints(alignments.query_len(), cuts)
}
