use tracing::info;

use super::{sub_contig_name, Borders, ChimeraError, ContigStore};

/// Slice `sequence` into one named piece per border.
///
/// Fails with [`ChimeraError::SplitInvariantViolated`] unless the pieces,
/// concatenated in order, reproduce `sequence` exactly.
pub fn split_sequence(
    contig: &str,
    sequence: &[u8],
    borders: &Borders,
) -> Result<Vec<(String, Vec<u8>)>, ChimeraError> {
    let violated = || ChimeraError::SplitInvariantViolated {
        contig: contig.to_string(),
    };

    let mut pieces = Vec::with_capacity(borders.len());
    let mut rebuilt = Vec::with_capacity(sequence.len());
    for border in borders {
        let piece = sequence
            .get(border.start as usize..border.end as usize)
            .ok_or_else(violated)?;
        rebuilt.extend_from_slice(piece);
        pieces.push((sub_contig_name(contig, border), piece.to_vec()));
    }

    if rebuilt != sequence {
        return Err(violated());
    }
    Ok(pieces)
}

/// Replace `contig` in the store with its pieces, in place.
///
/// The store is left untouched on error.
pub fn break_contig(
    contigs: &mut ContigStore,
    contig: &str,
    borders: &Borders,
) -> Result<(), ChimeraError> {
    let pieces = {
        let sequence = contigs
            .get(contig)
            .ok_or_else(|| ChimeraError::MissingSequence(contig.to_string()))?;
        split_sequence(contig, sequence, borders)?
    };
    commit_pieces(contigs, contig, pieces);
    Ok(())
}

/// Swap a contig's entry for already-validated pieces, keeping store order.
pub(crate) fn commit_pieces(
    contigs: &mut ContigStore,
    contig: &str,
    pieces: Vec<(String, Vec<u8>)>,
) {
    let Some((position, _, _)) = contigs.shift_remove_full(contig) else {
        return;
    };
    info!(contig, pieces = pieces.len(), "contig broken");
    for (offset, (name, piece)) in pieces.into_iter().enumerate() {
        contigs.shift_insert(position + offset, name, piece);
    }
}
