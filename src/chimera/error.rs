use thiserror::Error;

/// Errors raised while deciding on or applying a contig split.
#[derive(Debug, Error)]
pub enum ChimeraError {
    /// No alignment survived length filtering, so coverage fractions are undefined.
    #[error("insufficient alignment coverage for contig {contig}")]
    InsufficientCoverage {
        /// Contig being scored.
        contig: String,
    },

    /// Concatenating the sliced pieces did not reproduce the original sequence.
    #[error("broken-contig split invariant violated for contig {contig}")]
    SplitInvariantViolated {
        /// Contig being split.
        contig: String,
    },

    /// A feature did not fall in exactly one border.
    #[error("feature at {start} on contig {contig} matched {matches} borders (expected 1)")]
    AmbiguousFeaturePlacement {
        /// Contig being split.
        contig: String,
        /// Feature start coordinate used for the lookup.
        start: u32,
        /// Number of borders containing the start coordinate.
        matches: usize,
    },

    /// A feature starts in one border but runs past its end.
    #[error("feature {start}-{end} on contig {contig} crosses border {border_start}-{border_end}")]
    FeatureOutsideBorder {
        /// Contig being split.
        contig: String,
        /// Feature start.
        start: u32,
        /// Feature end.
        end: u32,
        /// Start of the border holding the feature start.
        border_start: u32,
        /// End of the border holding the feature start.
        border_end: u32,
    },

    /// Borders do not tile `[0, query_len)`.
    #[error("borders for contig {contig} do not tile the contig: {reason}")]
    BrokenTiling {
        /// Contig the borders belong to.
        contig: String,
        /// Description of the first violation found.
        reason: String,
    },

    /// An alignment record is inconsistent with its contig.
    #[error("invalid alignment for contig {contig}: {reason}")]
    InvalidAlignment {
        /// Contig the alignment belongs to.
        contig: String,
        /// Description of the inconsistency.
        reason: String,
    },

    /// Coordinate does not fit the interval index.
    #[error("coordinate {0} exceeds interval index range")]
    CoordinateOverflow(u32),

    /// The sequence store has no entry for the contig.
    #[error("no sequence found for contig {0}")]
    MissingSequence(String),
}
