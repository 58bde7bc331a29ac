use coitrees::{COITree, Interval as TreeNode, IntervalTree};
use tracing::debug;

use super::{Borders, ChimeraError, Feature, Interval};

/// Convert a 0-based coordinate into the index's `i32` space.
fn tree_coord(pos: u32) -> Result<i32, ChimeraError> {
    i32::try_from(pos).map_err(|_| ChimeraError::CoordinateOverflow(pos))
}

/// Interval index over non-empty features of one contig.
pub struct FeatureIndex {
    tree: Option<COITree<u32, u32>>,
}

impl std::fmt::Debug for FeatureIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureIndex")
            .field("features", &self.tree.as_ref().map_or(0, |t| t.len()))
            .finish()
    }
}

impl FeatureIndex {
    /// Index every feature with non-zero length.
    pub fn build(features: &[Feature]) -> Result<Self, ChimeraError> {
        // coitrees intervals are end-inclusive
        let mut nodes = Vec::with_capacity(features.len());
        for (idx, feature) in features.iter().enumerate() {
            if feature.end <= feature.start {
                continue;
            }
            nodes.push(TreeNode::new(
                tree_coord(feature.start)?,
                tree_coord(feature.end - 1)?,
                idx as u32,
            ));
        }

        let tree = if nodes.is_empty() {
            None
        } else {
            Some(COITree::new(&nodes))
        };
        Ok(Self { tree })
    }

    /// First position at or after `pos` that no feature contains.
    ///
    /// Jumps straight past the furthest-reaching feature covering the probe
    /// instead of stepping one base at a time; the result is the same.
    pub fn next_free(&self, pos: u32) -> Result<u32, ChimeraError> {
        let mut probe = pos;
        while let Some(end) = self.furthest_cover(probe)? {
            probe = end;
        }
        Ok(probe)
    }

    /// Exclusive end of the longest-reaching feature containing `pos`.
    fn furthest_cover(&self, pos: u32) -> Result<Option<u32>, ChimeraError> {
        let Some(tree) = &self.tree else {
            return Ok(None);
        };
        let point = tree_coord(pos)?;
        let mut furthest: Option<i32> = None;
        tree.query(point, point, |node| {
            furthest = Some(furthest.map_or(node.last, |f| f.max(node.last)));
        });
        Ok(furthest.map(|last| last as u32 + 1))
    }
}

/// Move border endpoints out of annotated features.
///
/// Each border start and end is pushed forward until no feature contains
/// it. The contig's own ends never move. The adjusted interior boundaries
/// are then re-derived into a tiling border set, so a boundary pushed past
/// its neighbour collapses the piece in between.
pub fn avoid_features(
    contig: &str,
    borders: &Borders,
    features: &[Feature],
) -> Result<Borders, ChimeraError> {
    let index = FeatureIndex::build(features)?;

    let mut adjusted = Vec::with_capacity(borders.len());
    for border in borders {
        let start = index.next_free(border.start)?;
        let end = index.next_free(border.end)?;
        if start != border.start || end != border.end {
            debug!(
                contig,
                from = %border,
                start,
                end,
                "border moved out of feature"
            );
        }
        adjusted.push((start, end));
    }

    if let Some(first) = adjusted.first_mut() {
        first.0 = 0;
    }
    if let Some(last) = adjusted.last_mut() {
        last.1 = borders.query_len();
    }

    let cuts: Vec<u32> = adjusted[..adjusted.len().saturating_sub(1)]
        .iter()
        .map(|&(_, end)| end)
        .collect();
    let normalised = Borders::from_breakpoints(borders.query_len(), cuts);
    normalised.validate(contig)?;
    Ok(normalised)
}

/// `true` when neither end of `border` lies strictly inside a feature.
pub fn border_clear_of(border: &Interval, features: &[Feature]) -> bool {
    features.iter().all(|feature| {
        let inside = |pos: u32| feature.start < pos && pos < feature.end;
        !inside(border.start) && !inside(border.end)
    })
}
