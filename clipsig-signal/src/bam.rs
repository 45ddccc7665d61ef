use noodles::bam;
use noodles::core::Region;
use noodles::sam;
use noodles::sam::alignment::Record as SamRecord;

use clipsig_core::models::{GenomicRange, Interval, Strand};

use crate::SignalAccessor;
use crate::errors::SignalError;

/// Crosslink counts from an indexed BAM file of iCLIP reads.
///
/// Each read contributes a single crosslink. By default that is the base
/// directly 5' of the read (the truncation site); with `centre` set it is the
/// middle of the alignment instead. Reads are assigned to the strand they
/// align to.
pub struct BamAccessor {
    path: String,
    centre: bool,
}

impl BamAccessor {
    ///
    /// Open the BAM file once to check that it and its `.bai` index are
    /// readable.
    ///
    pub fn new(path: &str, centre: bool) -> Result<Self, SignalError> {
        let mut reader = bam::io::indexed_reader::Builder::default()
            .build_from_path(path)
            .map_err(|e| SignalError::BamOpenError {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        reader.read_header().map_err(|e| SignalError::BamOpenError {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        Ok(BamAccessor {
            path: path.to_string(),
            centre,
        })
    }
}

///
/// 0-based crosslink position for an alignment spanning the 1-based inclusive
/// coordinates `start..=end`.
///
/// Returns `None` when the site would fall before the start of the contig.
///
pub fn crosslink_position(start: usize, end: usize, reverse: bool, centre: bool) -> Option<u32> {
    let pos = if centre {
        // midpoint of the 0-based half-open span [start - 1, end)
        (start - 1) + (end + 1 - start) / 2
    } else if reverse {
        end
    } else {
        start.checked_sub(2)?
    };
    u32::try_from(pos).ok()
}

/// Whether the BAM header lists `chr` as a reference sequence.
pub fn has_reference(header: &sam::Header, chr: &str) -> bool {
    header.reference_sequences().contains_key(chr.as_bytes())
}

impl BamAccessor {
    ///
    /// Counts over each of `ranges` on `strand`, read through a single
    /// reader and index load.
    ///
    fn range_counts(
        &self,
        ranges: &[GenomicRange],
        strand: Strand,
    ) -> Result<Vec<Vec<u32>>, SignalError> {
        // noodles readers are not Sync, so every fetch opens its own handle
        let mut reader = bam::io::indexed_reader::Builder::default().build_from_path(&self.path)?;
        let header = reader.read_header()?;

        let mut profiles = Vec::with_capacity(ranges.len());
        for range in ranges {
            let mut profile = vec![0u32; range.width() as usize];

            // contigs missing from the BAM header have no reads
            if !has_reference(&header, &range.chr) {
                log::debug!("Contig {} not in BAM header, counting zeros", range.chr);
                profiles.push(profile);
                continue;
            }

            // truncation sites can lie one base outside the reads that produce them
            let padded = GenomicRange {
                chr: range.chr.clone(),
                start: range.start.saturating_sub(1),
                end: range.end + 1,
            };
            let region: Region = padded
                .as_query_string()
                .parse()
                .map_err(|_| SignalError::InvalidRegion(range.to_string()))?;

            let query =
                reader
                    .query(&header, &region)
                    .map_err(|e| SignalError::BamQueryError {
                        region: format!("{} in {}", region, self.path),
                        reason: e.to_string(),
                    })?;

            for result in query {
                let record = result?;
                let flags = record.flags();
                if flags.is_unmapped()
                    || flags.is_secondary()
                    || flags.is_supplementary()
                    || flags.is_duplicate()
                    || flags.is_qc_fail()
                {
                    continue;
                }

                let reverse = flags.is_reverse_complemented();
                let read_strand = if reverse { Strand::Minus } else { Strand::Plus };
                if read_strand != strand {
                    continue;
                }

                let (Some(start), Some(end)) = (
                    record.alignment_start().transpose()?,
                    SamRecord::alignment_end(&record).transpose()?,
                ) else {
                    continue;
                };

                if let Some(pos) = crosslink_position(start.get(), end.get(), reverse, self.centre) {
                    if range.contains(pos) {
                        profile[(pos - range.start) as usize] += 1;
                    }
                }
            }
            profiles.push(profile);
        }

        Ok(profiles)
    }
}

impl SignalAccessor for BamAccessor {
    fn counts(&self, range: &GenomicRange, strand: Strand) -> Result<Vec<u32>, SignalError> {
        let mut profiles = self.range_counts(std::slice::from_ref(range), strand)?;
        Ok(profiles.pop().unwrap_or_default())
    }

    fn interval_counts(&self, interval: &Interval) -> Result<Vec<u32>, SignalError> {
        let profiles = self.range_counts(interval.ranges(), interval.strand)?;
        Ok(profiles.concat())
    }
}
