use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntervalError {
    #[error("Interval {0} has no sub-ranges")]
    EmptyInterval(String),

    #[error("Interval {0} spans more than one contig")]
    MixedContigs(String),

    #[error("Interval {0} has overlapping or unsorted sub-ranges")]
    OverlappingRanges(String),

    #[error("Invalid range {chr}:{start}-{end}")]
    InvalidRange { chr: String, start: u32, end: u32 },
}

#[derive(Error, Debug)]
pub enum GtfError {
    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error("Unknown feature grouping: {0}. Must be one of `gene` or `transcript`")]
    InvalidGrouping(String),

    #[error("Error parsing GTF line {line}: {reason}")]
    ParseError { line: usize, reason: String },

    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
