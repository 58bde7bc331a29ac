//! Breakpoint inference for chimeric contigs.
//!
//! Data flows leaf to root:
//! alignments → [`significant_references`] → [`cluster_contig_alignments`]
//! (or [`find_intrachromosomal_break`]) → [`avoid_features`] →
//! [`split_sequence`] and [`remap_features`].
//!
//! Every stage works on one contig at a time and owns or borrows its
//! inputs; nothing is shared between contigs.

mod adjust;
mod borders;
mod coverage;
mod error;
mod inter;
mod intra;
mod remap;
mod split;
mod types;

use indexmap::IndexMap;

pub use adjust::{avoid_features, border_clear_of, FeatureIndex};
pub use borders::{sub_contig_name, Borders, BROKEN_TAG};
pub use coverage::{reference_coverage, significant_references, union_length, ReferenceCoverage};
pub use error::ChimeraError;
pub use inter::{cluster_contig_alignments, query_order, switch_points};
pub use intra::{best_reference, find_intrachromosomal_break, longest_alignment, IntraThresholds};
pub use remap::{remap_features, update_features};
pub use split::{break_contig, split_sequence};
pub use types::{AlignmentRecord, AlignmentSet, Feature, Interval, Strand};

pub(crate) use remap::commit_features;
pub(crate) use split::commit_pieces;

/// Contig sequences keyed by name, in input order.
pub type ContigStore = IndexMap<String, Vec<u8>>;

/// Features keyed by the name of the sequence they sit on, in input order.
pub type FeatureStore = IndexMap<String, Vec<Feature>>;
