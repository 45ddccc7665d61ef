use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("No signal source given. Supply one of a BAM, BigWig or BED file")]
    NoSignalSource,

    #[error("Can't open BAM file {path}: {reason}")]
    BamOpenError { path: String, reason: String },

    #[error("BAM query for {region} failed: {reason}")]
    BamQueryError { region: String, reason: String },

    #[error("BigWig error: {0}")]
    BigWigError(String),

    #[error("Error parsing crosslink BED line {line}: {reason}")]
    BedParseError { line: usize, reason: String },

    #[error("Invalid region {0}")]
    InvalidRegion(String),

    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
