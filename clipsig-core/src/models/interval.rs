use crate::errors::IntervalError;
use crate::models::{GenomicRange, Strand};

/// A stranded gene or transcript model: an ordered set of disjoint sub-ranges
/// on a single contig.
///
/// Per-base data for an interval (counts, heights) is indexed in the
/// concatenated coordinate system of the sub-ranges, lowest genomic position
/// first, regardless of strand.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Interval {
    pub id: String,
    pub strand: Strand,
    ranges: Vec<GenomicRange>,
}

impl Interval {
    ///
    /// Create a new interval, checking that the sub-ranges share one contig,
    /// are sorted and do not overlap.
    ///
    pub fn new(id: &str, strand: Strand, ranges: Vec<GenomicRange>) -> Result<Self, IntervalError> {
        let first = ranges
            .first()
            .ok_or_else(|| IntervalError::EmptyInterval(id.to_string()))?;

        if ranges.iter().any(|r| r.chr != first.chr) {
            return Err(IntervalError::MixedContigs(id.to_string()));
        }

        for pair in ranges.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(IntervalError::OverlappingRanges(id.to_string()));
            }
        }

        Ok(Interval {
            id: id.to_string(),
            strand,
            ranges,
        })
    }

    pub fn ranges(&self) -> &[GenomicRange] {
        &self.ranges
    }

    pub fn contig(&self) -> &str {
        &self.ranges[0].chr
    }

    /// Total number of bases, the sum of the sub-range widths.
    pub fn len(&self) -> usize {
        self.ranges.iter().map(|r| r.width() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Genomic position of every base, in concatenated order.
    pub fn positions(&self) -> impl Iterator<Item = u32> + '_ {
        self.ranges.iter().flat_map(|r| r.start..r.end)
    }

    ///
    /// The gaps between consecutive sub-ranges, each as its own single-range
    /// interval named `<id>:intron<N>` (numbered from 1 in genomic order).
    ///
    pub fn introns(&self) -> Vec<Interval> {
        self.ranges
            .windows(2)
            .filter(|pair| pair[0].end < pair[1].start)
            .enumerate()
            .map(|(i, pair)| Interval {
                id: format!("{}:intron{}", self.id, i + 1),
                strand: self.strand,
                ranges: vec![GenomicRange {
                    chr: pair[0].chr.clone(),
                    start: pair[0].end,
                    end: pair[1].start,
                }],
            })
            .collect()
    }
}
