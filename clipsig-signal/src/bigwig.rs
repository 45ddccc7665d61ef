use bigtools::BigWigRead;

use clipsig_core::models::{GenomicRange, Strand};

use crate::SignalAccessor;
use crate::errors::SignalError;

/// Crosslink counts from already processed BigWig tracks, one per strand.
///
/// Values are rounded to whole crosslinks. Minus-strand tracks are often
/// stored as negative signal, so the absolute value is used. Without a
/// minus-strand track the plus-strand track serves both strands.
pub struct BigWigAccessor {
    plus: String,
    minus: Option<String>,
}

impl BigWigAccessor {
    pub fn new(plus: &str, minus: Option<&str>) -> Result<Self, SignalError> {
        for path in std::iter::once(plus).chain(minus) {
            BigWigRead::open_file(path)
                .map_err(|e| SignalError::BigWigError(format!("{}: {:?}", path, e)))?;
        }

        Ok(BigWigAccessor {
            plus: plus.to_string(),
            minus: minus.map(str::to_string),
        })
    }

    fn track(&self, strand: Strand) -> &str {
        match (strand, &self.minus) {
            (Strand::Minus, Some(minus)) => minus,
            _ => &self.plus,
        }
    }
}

/// Convert raw BigWig values to crosslink counts. Missing bases (NaN) are
/// zero.
pub fn values_to_counts(values: &[f32]) -> Vec<u32> {
    values
        .iter()
        .map(|v| if v.is_nan() { 0 } else { v.abs().round() as u32 })
        .collect()
}

impl SignalAccessor for BigWigAccessor {
    fn counts(&self, range: &GenomicRange, strand: Strand) -> Result<Vec<u32>, SignalError> {
        let path = self.track(strand);
        let mut reader = BigWigRead::open_file(path)
            .map_err(|e| SignalError::BigWigError(format!("{}: {:?}", path, e)))?;

        let known_contig = reader
            .info()
            .chrom_info
            .iter()
            .any(|chrom| chrom.name == range.chr);
        if !known_contig {
            return Ok(vec![0; range.width() as usize]);
        }

        let values = reader
            .values(&range.chr, range.start, range.end)
            .map_err(|e| SignalError::BigWigError(format!("{} at {}: {:?}", path, range, e)))?;

        Ok(values_to_counts(&values))
    }
}
