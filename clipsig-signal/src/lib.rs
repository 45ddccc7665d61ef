//! Crosslink signal accessors.
//!
//! Every accessor answers the same question: given a genomic range and a
//! strand, how many crosslinks landed on each base? The engine only ever sees
//! the [`SignalAccessor`] trait, so BAM, BigWig and BED inputs are
//! interchangeable.

pub mod bam;
pub mod bed;
pub mod bigwig;
pub mod errors;

use clipsig_core::models::{GenomicRange, Interval, Strand};

pub use self::bam::BamAccessor;
pub use self::bed::BedAccessor;
pub use self::bigwig::BigWigAccessor;
pub use self::errors::SignalError;

pub trait SignalAccessor: Send + Sync {
    ///
    /// Per-base crosslink counts over `range` on `strand`, lowest position
    /// first. The returned vector always has `range.width()` entries.
    ///
    fn counts(&self, range: &GenomicRange, strand: Strand) -> Result<Vec<u32>, SignalError>;

    ///
    /// Counts over every sub-range of an interval, concatenated in the
    /// interval's coordinate system.
    ///
    fn interval_counts(&self, interval: &Interval) -> Result<Vec<u32>, SignalError> {
        let mut profile = Vec::with_capacity(interval.len());
        for range in interval.ranges() {
            profile.extend(self.counts(range, interval.strand)?);
        }
        Ok(profile)
    }
}

impl<T: SignalAccessor + ?Sized> SignalAccessor for Box<T> {
    fn counts(&self, range: &GenomicRange, strand: Strand) -> Result<Vec<u32>, SignalError> {
        (**self).counts(range, strand)
    }
}

/// The signal inputs a run was configured with.
#[derive(Debug, Clone, Default)]
pub struct SignalSources {
    pub bam: Option<String>,
    pub centre: bool,
    pub plus_wig: Option<String>,
    pub minus_wig: Option<String>,
    pub bed: Option<String>,
}

///
/// Build the accessor for the configured inputs. A BAM file takes precedence
/// over BigWig files, which take precedence over a BED file.
///
pub fn make_accessor(sources: &SignalSources) -> Result<Box<dyn SignalAccessor>, SignalError> {
    if let Some(bam) = &sources.bam {
        log::debug!("Reading crosslinks from BAM file {}", bam);
        Ok(Box::new(BamAccessor::new(bam, sources.centre)?))
    } else if let Some(plus_wig) = &sources.plus_wig {
        log::debug!("Reading crosslinks from BigWig file {}", plus_wig);
        Ok(Box::new(BigWigAccessor::new(
            plus_wig,
            sources.minus_wig.as_deref(),
        )?))
    } else if let Some(bed) = &sources.bed {
        log::debug!("Reading crosslinks from BED file {}", bed);
        Ok(Box::new(BedAccessor::from_path(bed)?))
    } else {
        Err(SignalError::NoSignalSource)
    }
}
