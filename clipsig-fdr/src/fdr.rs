use std::collections::BTreeMap;

use clipsig_core::models::Strand;

use crate::errors::{ConfigError, FdrError};
use crate::histogram::{HeightHistogram, count_at_least};

/// One significant-base candidate: a base with nonzero observed height.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub contig: String,
    pub position: u32,
    pub strand: Strand,
    /// Observed height, reported as depth.
    pub height: u32,
    pub fdr: f64,
}

/// FDR for every distinct nonzero observed height.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FdrTable {
    fdrs: BTreeMap<u32, f64>,
}

impl FdrTable {
    /// FDR of a base with height `h`. Heights that were never observed, and
    /// zero, have FDR 1.
    pub fn get(&self, h: u32) -> f64 {
        self.fdrs.get(&h).copied().unwrap_or(1.0)
    }

    pub fn len(&self) -> usize {
        self.fdrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fdrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.fdrs.iter().map(|(&h, &f)| (h, f))
    }
}

///
/// Estimate the FDR at every nonzero observed height.
///
/// For a threshold `h`:
///
/// ```text
/// FDR(h) = (null bases with height >= h / randomisations)
///          / observed bases with height >= h
/// ```
///
/// clipped to 1. With `monotone` set, walking from the lowest height upwards
/// each FDR is capped by the one below it, so FDR never rises with height.
///
/// # Arguments
/// - observed: heights of every observed base
/// - null: heights of every randomised base, over all draws
/// - randomisations: draws per interval that went into `null`
/// - monotone: apply the step-down correction
///
pub fn estimate_fdr(
    observed: &HeightHistogram,
    null: &HeightHistogram,
    randomisations: u32,
    monotone: bool,
) -> Result<FdrTable, FdrError> {
    if randomisations == 0 {
        return Err(ConfigError::NoRandomisations.into());
    }
    if null.is_empty() {
        return Err(FdrError::EmptyNullDistribution);
    }

    let observed_tails = observed.tail_counts();
    let null_tails = null.tail_counts();

    let mut fdrs = BTreeMap::new();
    let mut ceiling = 1.0f64;
    for h in observed.nonzero_heights() {
        let expected = count_at_least(&null_tails, h) as f64 / randomisations as f64;
        let seen = count_at_least(&observed_tails, h) as f64;
        let mut fdr = (expected / seen).min(1.0);
        if monotone {
            fdr = fdr.min(ceiling);
            ceiling = fdr;
        }
        fdrs.insert(h, fdr);
    }

    Ok(FdrTable { fdrs })
}
