//! # Chimeric contig breaking
//!
//! Finds assembly contigs that glue together material from different
//! reference chromosomes, or from distant loci of one chromosome, and cuts
//! them apart using their alignments to a reference genome.
//!
//! ## Pipeline
//!
//! 1. **Coverage scoring**: union length of reference bases per chromosome
//! 2. **Clustering**: walk alignments in contig order, cut where the chromosome switches
//! 3. **Intrachromosomal check**: cut at a large jump within the best chromosome
//! 4. **Adjustment**: push cuts out of annotated features
//! 5. **Splitting**: slice the sequence and move features onto the pieces
//!
//! ## Usage Example
//!
//! ```ignore
//! use chimbreak::{BreakerConfig, ChimeraBreaker};
//!
//! let breaker = ChimeraBreaker::new(BreakerConfig::default())?;
//! let reports = breaker.process_all(&alignments, &mut contigs, &mut features)?;
//! for report in &reports {
//!     println!("{} -> {} pieces", report.contig, report.borders.len());
//! }
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod chimera; // Breakpoint inference, splitting and feature remapping
pub mod io; // PAF, GFF, FASTA and report formats

pub use chimera::{
    AlignmentRecord, AlignmentSet, Borders, ChimeraError, ContigStore, Feature, FeatureStore,
    Interval, Strand,
};

use std::collections::BTreeSet;
use std::fmt;

use chimera::IntraThresholds;
use thiserror::Error;
use tracing::{debug, info};

/// Thresholds and switches for chimera breaking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreakerConfig {
    /// Alignments shorter than this are ignored.
    pub min_alignment_len: u32,

    /// Share of total covered length (percent) a chromosome must exceed.
    pub min_ref_percent: f64,

    /// Covered reference bases a chromosome must exceed.
    pub min_ref_bases: u64,

    /// Reference jump between consecutive alignments that flags a misjoin.
    pub intra_ref_gap: u64,

    /// Contig jump between consecutive alignments that flags a misjoin.
    pub intra_query_gap: u64,

    /// Look for intrachromosomal chimeras in contigs not already broken.
    pub intrachromosomal: bool,

    /// Contigs never examined.
    pub ignore: BTreeSet<String>,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            min_alignment_len: 10_000,
            min_ref_percent: 5.0,
            min_ref_bases: 100_000,
            intra_ref_gap: 2_000_000,
            intra_query_gap: 1_000_000,
            intrachromosomal: true,
            ignore: BTreeSet::new(),
        }
    }
}

impl BreakerConfig {
    /// Set the minimum alignment length.
    pub fn with_min_alignment_len(mut self, len: u32) -> Self {
        self.min_alignment_len = len;
        self
    }

    /// Set the percentage and absolute coverage a chromosome must exceed.
    pub fn with_significance(mut self, percent: f64, bases: u64) -> Self {
        self.min_ref_percent = percent;
        self.min_ref_bases = bases;
        self
    }

    /// Set the reference and contig gaps that flag an intrachromosomal misjoin.
    pub fn with_intra_gaps(mut self, ref_gap: u64, query_gap: u64) -> Self {
        self.intra_ref_gap = ref_gap;
        self.intra_query_gap = query_gap;
        self
    }

    /// Enable or disable the intrachromosomal pass.
    pub fn with_intrachromosomal(mut self, enabled: bool) -> Self {
        self.intrachromosomal = enabled;
        self
    }

    /// Skip the given contigs.
    pub fn with_ignored<I, S>(mut self, contigs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(contigs.into_iter().map(Into::into));
        self
    }

    /// Reject settings that cannot be satisfied.
    pub fn validate(&self) -> Result<(), BreakerError> {
        if !(0.0..=100.0).contains(&self.min_ref_percent) {
            return Err(BreakerError::InvalidConfig(format!(
                "minimum reference percentage {} outside [0, 100]",
                self.min_ref_percent
            )));
        }
        Ok(())
    }

    fn intra_thresholds(&self) -> IntraThresholds {
        IntraThresholds {
            min_len: self.min_alignment_len,
            max_ref_gap: self.intra_ref_gap,
            max_query_gap: self.intra_query_gap,
        }
    }
}

/// Kind of misjoin that caused a contig to be broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BreakKind {
    /// Contig spans more than one reference chromosome.
    Interchromosomal,
    /// Contig jumps within a single reference chromosome.
    Intrachromosomal,
}

impl fmt::Display for BreakKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakKind::Interchromosomal => f.write_str("interchromosomal"),
            BreakKind::Intrachromosomal => f.write_str("intrachromosomal"),
        }
    }
}

/// Decision to break one contig.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreakReport {
    /// Contig being broken.
    pub contig: String,
    /// Which pass found the misjoin.
    pub kind: BreakKind,
    /// Final, feature-adjusted borders.
    pub borders: Borders,
}

impl BreakReport {
    /// Names of the sub-contigs this report produces.
    pub fn sub_contig_names(&self) -> Vec<String> {
        self.borders
            .iter()
            .map(|border| chimera::sub_contig_name(&self.contig, border))
            .collect()
    }
}

/// Errors surfaced by the breaker.
#[derive(Debug, Error)]
pub enum BreakerError {
    /// Configuration rejected by [`BreakerConfig::validate`].
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure while inferring or applying a split.
    #[error("chimera error: {0}")]
    Chimera(#[from] ChimeraError),
}

/// Per-contig chimera detection and breaking.
#[derive(Debug, Clone)]
pub struct ChimeraBreaker {
    config: BreakerConfig,
}

impl ChimeraBreaker {
    /// Create a breaker after validating `config`.
    pub fn new(config: BreakerConfig) -> Result<Self, BreakerError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    /// Decide whether and where to break one contig.
    ///
    /// The interchromosomal pass runs first; the intrachromosomal pass only
    /// runs when it is enabled and the first pass left the contig whole.
    /// Returns `None` for ignored contigs and for contigs that stay whole
    /// once borders have been moved out of `features`.
    pub fn plan_contig(
        &self,
        alignments: &AlignmentSet,
        features: &[Feature],
    ) -> Result<Option<BreakReport>, BreakerError> {
        let contig = alignments.contig();
        if self.config.ignore.contains(contig) {
            debug!(contig, "ignored");
            return Ok(None);
        }

        let Some((kind, raw)) = self.raw_borders(alignments)? else {
            return Ok(None);
        };

        let borders = chimera::avoid_features(contig, &raw, features)?;
        if !borders.is_split() {
            debug!(contig, "split absorbed by features");
            return Ok(None);
        }

        info!(contig, %kind, breakpoints = ?borders.breakpoints(), "chimeric contig");
        Ok(Some(BreakReport {
            contig: contig.to_string(),
            kind,
            borders,
        }))
    }

    fn raw_borders(
        &self,
        alignments: &AlignmentSet,
    ) -> Result<Option<(BreakKind, Borders)>, BreakerError> {
        let config = &self.config;
        match chimera::significant_references(
            alignments,
            config.min_alignment_len,
            config.min_ref_percent,
            config.min_ref_bases,
        ) {
            Ok(references) if references.len() > 1 => {
                let borders =
                    chimera::cluster_contig_alignments(&alignments.with_references(&references));
                if borders.is_split() {
                    return Ok(Some((BreakKind::Interchromosomal, borders)));
                }
            }
            Ok(_) => {}
            Err(ChimeraError::InsufficientCoverage { contig }) => {
                debug!(%contig, "no alignment long enough to score");
            }
            Err(err) => return Err(err.into()),
        }

        if !config.intrachromosomal {
            return Ok(None);
        }
        Ok(
            chimera::find_intrachromosomal_break(alignments, &config.intra_thresholds())
                .map(|borders| (BreakKind::Intrachromosomal, borders)),
        )
    }

    /// Apply a planned break to the sequence and feature stores.
    ///
    /// Both edits are computed before either store is touched, so a failure
    /// leaves the stores as they were.
    pub fn apply(
        &self,
        report: &BreakReport,
        contigs: &mut ContigStore,
        features: &mut FeatureStore,
    ) -> Result<(), BreakerError> {
        let contig = report.contig.as_str();
        let sequence = contigs
            .get(contig)
            .ok_or_else(|| ChimeraError::MissingSequence(contig.to_string()))?;
        let pieces = chimera::split_sequence(contig, sequence, &report.borders)?;

        let contig_features = features.get(contig).map(Vec::as_slice).unwrap_or_default();
        let remapped = chimera::remap_features(contig, contig_features, &report.borders)?;

        chimera::commit_pieces(contigs, contig, pieces);
        chimera::commit_features(features, contig, remapped);
        Ok(())
    }

    /// Plan and apply breaks for every contig with alignments.
    ///
    /// Contigs are handled in the order given. Processing stops at the first
    /// contig that fails; contigs before it keep their edits.
    pub fn process_all(
        &self,
        alignments: &[AlignmentSet],
        contigs: &mut ContigStore,
        features: &mut FeatureStore,
    ) -> Result<Vec<BreakReport>, BreakerError> {
        let mut reports = Vec::new();
        for set in alignments {
            let contig_features = features
                .get(set.contig())
                .map(Vec::as_slice)
                .unwrap_or_default();
            if let Some(report) = self.plan_contig(set, contig_features)? {
                self.apply(&report, contigs, features)?;
                reports.push(report);
            }
        }

        info!(
            examined = alignments.len(),
            broken = reports.len(),
            "chimera breaking finished"
        );
        Ok(reports)
    }
}
