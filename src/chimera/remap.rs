use indexmap::IndexMap;
use tracing::debug;

use super::{sub_contig_name, Borders, ChimeraError, Feature, FeatureStore};

/// Move features onto the sub-contigs produced by `borders`.
///
/// Every feature must start inside exactly one border and end within it;
/// its coordinates are shifted to that border's origin and it is renamed
/// after the sub-contig. Every border gets an entry, empty or not.
pub fn remap_features(
    contig: &str,
    features: &[Feature],
    borders: &Borders,
) -> Result<IndexMap<String, Vec<Feature>>, ChimeraError> {
    let pieces = borders.as_slice();
    let names: Vec<String> = pieces.iter().map(|b| sub_contig_name(contig, b)).collect();

    let mut remapped: IndexMap<String, Vec<Feature>> =
        names.iter().map(|name| (name.clone(), Vec::new())).collect();

    for feature in features {
        // borders tile the contig in order, so at most one can hold the start
        let idx = pieces.partition_point(|border| border.end <= feature.start);
        if !pieces
            .get(idx)
            .is_some_and(|border| border.contains(feature.start))
        {
            return Err(ChimeraError::AmbiguousFeaturePlacement {
                contig: contig.to_string(),
                start: feature.start,
                matches: 0,
            });
        }
        let border = pieces[idx];
        if feature.end > border.end {
            return Err(ChimeraError::FeatureOutsideBorder {
                contig: contig.to_string(),
                start: feature.start,
                end: feature.end,
                border_start: border.start,
                border_end: border.end,
            });
        }

        let mut moved = feature.clone();
        moved.seqname = names[idx].clone();
        moved.start -= border.start;
        moved.end -= border.start;
        remapped[idx].push(moved);
    }

    debug!(contig, features = features.len(), "features remapped");
    Ok(remapped)
}

/// Replace `contig`'s features in the store with their remapped copies.
///
/// The store is left untouched on error.
pub fn update_features(
    store: &mut FeatureStore,
    contig: &str,
    borders: &Borders,
) -> Result<(), ChimeraError> {
    let remapped = {
        let features = store.get(contig).map(Vec::as_slice).unwrap_or_default();
        remap_features(contig, features, borders)?
    };
    commit_features(store, contig, remapped);
    Ok(())
}

/// Swap a contig's feature list for its remapped lists, keeping store order.
pub(crate) fn commit_features(
    store: &mut FeatureStore,
    contig: &str,
    remapped: IndexMap<String, Vec<Feature>>,
) {
    let position = match store.shift_remove_full(contig) {
        Some((position, _, _)) => position,
        None => store.len(),
    };
    for (offset, (name, features)) in remapped.into_iter().enumerate() {
        store.shift_insert(position + offset, name, features);
    }
}
