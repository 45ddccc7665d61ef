use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use fxhash::FxHashMap;

use clipsig_core::models::{GenomicRange, Strand};
use clipsig_core::utils::{data_lines, get_dynamic_reader};

use crate::SignalAccessor;
use crate::errors::SignalError;

/// Crosslink counts from a BED6 file where the score column is the number of
/// crosslinks on every base of the entry. Held fully in memory.
pub struct BedAccessor {
    sites: FxHashMap<(String, Strand), BTreeMap<u32, u32>>,
}

impl BedAccessor {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SignalError> {
        let reader = get_dynamic_reader(path.as_ref())
            .map_err(|e| SignalError::FileReadError(e.to_string()))?;
        BedAccessor::from_reader(reader)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, SignalError> {
        let mut sites: FxHashMap<(String, Strand), BTreeMap<u32, u32>> = FxHashMap::default();

        for line in data_lines(reader) {
            let (line_no, line) = line?;
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 6 {
                return Err(SignalError::BedParseError {
                    line: line_no,
                    reason: format!("expected 6 columns, found {}", fields.len()),
                });
            }

            let parse_err = |reason: String| SignalError::BedParseError {
                line: line_no,
                reason,
            };
            let start = fields[1]
                .parse::<u32>()
                .map_err(|e| parse_err(format!("start: {}", e)))?;
            let end = fields[2]
                .parse::<u32>()
                .map_err(|e| parse_err(format!("end: {}", e)))?;
            let score = fields[4]
                .parse::<f64>()
                .map_err(|e| parse_err(format!("score: {}", e)))?;
            let strand = fields[5]
                .parse::<Strand>()
                .map_err(|e| parse_err(e.to_string()))?;

            let count = score.abs().round() as u32;
            if count == 0 {
                continue;
            }

            let contig = sites.entry((fields[0].to_string(), strand)).or_default();
            for pos in start..end {
                let total = contig.entry(pos).or_insert(0);
                *total = total.saturating_add(count);
            }
        }

        Ok(BedAccessor { sites })
    }
}

impl SignalAccessor for BedAccessor {
    fn counts(&self, range: &GenomicRange, strand: Strand) -> Result<Vec<u32>, SignalError> {
        let mut profile = vec![0u32; range.width() as usize];
        if let Some(contig) = self.sites.get(&(range.chr.clone(), strand)) {
            for (pos, count) in contig.range(range.start..range.end) {
                profile[(pos - range.start) as usize] = *count;
            }
        }
        Ok(profile)
    }
}
