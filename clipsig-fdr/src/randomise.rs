//! Empirical null heights by randomising a crosslink profile.
//!
//! Under the null hypothesis crosslinks land anywhere in an interval with equal
//! probability. Each draw therefore throws the interval's `T` crosslinks
//! independently and uniformly onto its `L` bases (a multinomial
//! redistribution, not a shuffle of the observed sites) and smooths the
//! result exactly like the observed profile.

use rand::Rng;

use crate::histogram::HeightHistogram;
use crate::smoothing::smooth;

///
/// One synthetic profile of length `len` holding `total` crosslinks placed
/// uniformly at random.
///
pub fn randomise_profile<R: Rng>(len: usize, total: u64, rng: &mut R) -> Vec<u32> {
    let mut profile = vec![0u32; len];
    if len == 0 {
        return profile;
    }
    for _ in 0..total {
        profile[rng.random_range(0..len)] += 1;
    }
    profile
}

///
/// Heights of `randomisations` synthetic profiles with the same length and
/// total as `observed`, pooled into one histogram.
///
/// A profile with no crosslinks still contributes `randomisations * L` zero
/// heights, so empty intervals weigh on the null exactly as often as they do
/// on the observed side.
///
pub fn null_heights<R: Rng>(
    observed: &[u32],
    randomisations: u32,
    spread: u32,
    rng: &mut R,
) -> HeightHistogram {
    let total: u64 = observed.iter().map(|&c| c as u64).sum();
    let mut histogram = HeightHistogram::new();

    if total == 0 {
        histogram.add_zeros(observed.len() as u64 * randomisations as u64);
        return histogram;
    }

    for _ in 0..randomisations {
        let profile = randomise_profile(observed.len(), total, rng);
        histogram.add_heights(&smooth(&profile, spread));
    }
    histogram
}
