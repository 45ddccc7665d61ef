use std::fmt::{self, Display};

use crate::errors::IntervalError;

///
/// A 0-based, half-open range on one contig.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct GenomicRange {
    pub chr: String,
    pub start: u32,
    pub end: u32,
}

impl GenomicRange {
    pub fn new(chr: &str, start: u32, end: u32) -> Result<Self, IntervalError> {
        if start >= end {
            return Err(IntervalError::InvalidRange {
                chr: chr.to_string(),
                start,
                end,
            });
        }
        Ok(GenomicRange {
            chr: chr.to_string(),
            start,
            end,
        })
    }

    ///
    /// Number of bases covered by the range
    ///
    pub fn width(&self) -> u32 {
        self.end - self.start
    }

    pub fn contains(&self, pos: u32) -> bool {
        self.start <= pos && pos < self.end
    }

    ///
    /// Region string in the `chr:start-end` form, with 1-based inclusive
    /// coordinates as understood by indexed BAM queries.
    ///
    pub fn as_query_string(&self) -> String {
        format!("{}:{}-{}", self.chr, self.start + 1, self.end)
    }
}

impl Display for GenomicRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chr, self.start, self.end)
    }
}
