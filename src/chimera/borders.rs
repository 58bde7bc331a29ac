use super::{ChimeraError, Interval};

/// Suffix joining a contig name to the span of one of its pieces.
pub const BROKEN_TAG: &str = "_chimera_broken";

/// Name of the sub-contig covering `border` of `contig`.
pub fn sub_contig_name(contig: &str, border: &Interval) -> String {
    format!("{contig}{BROKEN_TAG}:{}-{}", border.start, border.end)
}

/// Ordered split of a contig into pieces.
///
/// A valid set tiles `[0, query_len)`: the first border starts at 0, each
/// border starts where the previous one ends, and the last ends at
/// `query_len`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UncheckedBorders"))]
pub struct Borders {
    query_len: u32,
    intervals: Vec<Interval>,
}

/// Deserialized form of [`Borders`], checked before it is adopted.
#[cfg(feature = "serde")]
#[derive(Debug, serde::Deserialize)]
struct UncheckedBorders {
    query_len: u32,
    intervals: Vec<Interval>,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedBorders> for Borders {
    type Error = ChimeraError;

    fn try_from(raw: UncheckedBorders) -> Result<Self, Self::Error> {
        Borders::from_intervals("<deserialized>", raw.query_len, raw.intervals)
    }
}

impl Borders {
    /// Single border spanning the whole contig.
    pub fn whole(query_len: u32) -> Self {
        Self {
            query_len,
            intervals: vec![Interval::new(0, query_len)],
        }
    }

    /// Build borders from interior cut points.
    ///
    /// Points are sorted and deduplicated; points at or outside the contig
    /// ends are dropped, so the result always tiles the contig.
    pub fn from_breakpoints<I>(query_len: u32, points: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut cuts: Vec<u32> = points
            .into_iter()
            .filter(|&p| p > 0 && p < query_len)
            .collect();
        cuts.sort_unstable();
        cuts.dedup();

        let mut intervals = Vec::with_capacity(cuts.len() + 1);
        let mut start = 0;
        for cut in cuts {
            intervals.push(Interval::new(start, cut));
            start = cut;
        }
        intervals.push(Interval::new(start, query_len));

        Self {
            query_len,
            intervals,
        }
    }

    /// Adopt caller-supplied intervals after checking that they tile the contig.
    pub fn from_intervals(
        contig: &str,
        query_len: u32,
        intervals: Vec<Interval>,
    ) -> Result<Self, ChimeraError> {
        let borders = Self {
            query_len,
            intervals,
        };
        borders.validate(contig)?;
        Ok(borders)
    }

    /// Check the tiling invariant.
    pub fn validate(&self, contig: &str) -> Result<(), ChimeraError> {
        let broken = |reason: String| ChimeraError::BrokenTiling {
            contig: contig.to_string(),
            reason,
        };

        let first = self
            .intervals
            .first()
            .ok_or_else(|| broken("no borders".to_string()))?;
        if first.start != 0 {
            return Err(broken(format!("first border starts at {}", first.start)));
        }

        let mut expected = 0;
        for border in &self.intervals {
            if border.start != expected {
                return Err(broken(format!(
                    "border {border} does not start at {expected}"
                )));
            }
            if border.start > border.end {
                return Err(broken(format!("border {border} is reversed")));
            }
            expected = border.end;
        }

        if expected != self.query_len {
            return Err(broken(format!(
                "last border ends at {expected}, contig length is {}",
                self.query_len
            )));
        }
        Ok(())
    }

    /// Contig length the borders tile.
    pub fn query_len(&self) -> u32 {
        self.query_len
    }

    /// Number of pieces.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Always `false` for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns `true` when the contig is cut into more than one piece.
    pub fn is_split(&self) -> bool {
        self.intervals.len() > 1
    }

    /// Borders in contig order.
    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// Borders as a slice.
    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    /// Interior cut points.
    pub fn breakpoints(&self) -> Vec<u32> {
        self.intervals.iter().skip(1).map(|b| b.start).collect()
    }
}

impl<'a> IntoIterator for &'a Borders {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
