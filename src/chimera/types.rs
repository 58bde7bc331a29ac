use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::ChimeraError;

/// Half-open interval `[start, end)` in 0-based coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    /// Inclusive lower bound.
    pub start: u32,
    /// Exclusive upper bound.
    pub end: u32,
}

impl Interval {
    /// Construct a new interval. Callers must keep `start <= end`.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "interval start {start} past end {end}");
        Self { start, end }
    }

    /// Number of positions covered.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` when the interval covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` when `pos` lies in `[start, end)`.
    pub fn contains(&self, pos: u32) -> bool {
        self.start <= pos && pos < self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Relative orientation of query and reference in an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strand {
    /// `+`
    Forward,
    /// `-`
    Reverse,
}

impl Strand {
    /// Single-character representation used in PAF and GFF.
    pub fn as_char(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            other => Err(format!("unknown strand '{other}'")),
        }
    }
}

/// One alignment of a contig against a reference chromosome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    /// Reference chromosome name.
    pub reference: Arc<str>,
    /// 0-based reference start.
    pub ref_start: u32,
    /// Exclusive reference end.
    pub ref_end: u32,
    /// 0-based query start, always on the forward query strand.
    pub query_start: u32,
    /// Exclusive query end.
    pub query_end: u32,
    /// Alignment block length.
    pub aln_len: u32,
    /// Orientation of the query relative to the reference.
    pub strand: Strand,
}

impl AlignmentRecord {
    /// Construct an alignment record.
    pub fn new(
        reference: impl Into<Arc<str>>,
        ref_span: (u32, u32),
        query_span: (u32, u32),
        aln_len: u32,
        strand: Strand,
    ) -> Self {
        Self {
            reference: reference.into(),
            ref_start: ref_span.0,
            ref_end: ref_span.1,
            query_start: query_span.0,
            query_end: query_span.1,
            aln_len,
            strand,
        }
    }

    /// Reference span as an interval.
    pub fn reference_interval(&self) -> Interval {
        Interval::new(self.ref_start, self.ref_end)
    }
}

/// All alignments of a single contig.
///
/// The set is immutable once built; filters return a new set so a caller
/// holding the original never observes another caller's restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentSet {
    contig: Arc<str>,
    query_len: u32,
    records: Vec<AlignmentRecord>,
}

impl AlignmentSet {
    /// Build a set, checking every record against the contig length.
    pub fn new(
        contig: impl Into<Arc<str>>,
        query_len: u32,
        records: Vec<AlignmentRecord>,
    ) -> Result<Self, ChimeraError> {
        let contig = contig.into();
        for (idx, record) in records.iter().enumerate() {
            let reason = if record.ref_start > record.ref_end {
                Some(format!(
                    "record {idx}: reference start {} past end {}",
                    record.ref_start, record.ref_end
                ))
            } else if record.query_start > record.query_end {
                Some(format!(
                    "record {idx}: query start {} past end {}",
                    record.query_start, record.query_end
                ))
            } else if record.query_end > query_len {
                Some(format!(
                    "record {idx}: query end {} beyond contig length {query_len}",
                    record.query_end
                ))
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(ChimeraError::InvalidAlignment {
                    contig: contig.to_string(),
                    reason,
                });
            }
        }

        Ok(Self {
            contig,
            query_len,
            records,
        })
    }

    /// Contig (query) name shared by all records.
    pub fn contig(&self) -> &str {
        &self.contig
    }

    /// Total contig length.
    pub fn query_len(&self) -> u32 {
        self.query_len
    }

    /// Records in input order.
    pub fn records(&self) -> &[AlignmentRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no records remain.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Copy of the set keeping only alignments to the named references.
    pub fn with_references<S: AsRef<str>>(&self, references: &[S]) -> Self {
        let keep: FxHashSet<&str> = references.iter().map(AsRef::as_ref).collect();
        self.filtered(|record| keep.contains(record.reference.as_ref()))
    }

    /// Copy of the set keeping only alignments at least `min_len` long.
    pub fn with_min_length(&self, min_len: u32) -> Self {
        self.filtered(|record| record.aln_len >= min_len)
    }

    fn filtered<F>(&self, keep: F) -> Self
    where
        F: Fn(&AlignmentRecord) -> bool,
    {
        Self {
            contig: Arc::clone(&self.contig),
            query_len: self.query_len,
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

/// Annotation feature located on a contig.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    /// Name of the sequence the feature lives on.
    pub seqname: String,
    /// 0-based start.
    pub start: u32,
    /// Exclusive end.
    pub end: u32,
    /// Remaining annotation columns, carried through untouched.
    pub payload: Vec<String>,
}

impl Feature {
    /// Construct a feature with the given payload columns.
    pub fn new(seqname: impl Into<String>, start: u32, end: u32, payload: Vec<String>) -> Self {
        Self {
            seqname: seqname.into(),
            start,
            end,
            payload,
        }
    }

    /// Feature span as an interval.
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}
