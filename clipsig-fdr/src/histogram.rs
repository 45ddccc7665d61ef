use std::collections::BTreeMap;

/// Multiset of heights, keyed by value.
///
/// Positions are dropped: only how many bases reached each height matters for
/// the FDR. Merging is a plain sum, so partial histograms can be combined in
/// any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeightHistogram {
    counts: BTreeMap<u32, u64>,
    bases: u64,
}

impl HeightHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_heights(heights: &[u32]) -> Self {
        let mut histogram = HeightHistogram::new();
        histogram.add_heights(heights);
        histogram
    }

    pub fn add_heights(&mut self, heights: &[u32]) {
        for &height in heights {
            *self.counts.entry(height).or_insert(0) += 1;
        }
        self.bases += heights.len() as u64;
    }

    /// Account for `n` bases of height zero without visiting them.
    pub fn add_zeros(&mut self, n: u64) {
        if n > 0 {
            *self.counts.entry(0).or_insert(0) += n;
            self.bases += n;
        }
    }

    pub fn merge(&mut self, other: &HeightHistogram) {
        for (&height, &n) in &other.counts {
            *self.counts.entry(height).or_insert(0) += n;
        }
        self.bases += other.bases;
    }

    /// Total number of bases recorded, zeros included.
    pub fn bases(&self) -> u64 {
        self.bases
    }

    pub fn is_empty(&self) -> bool {
        self.bases == 0
    }

    pub fn max_height(&self) -> Option<u32> {
        self.counts.keys().next_back().copied()
    }

    /// Distinct heights above zero, ascending.
    pub fn nonzero_heights(&self) -> impl Iterator<Item = u32> + '_ {
        self.counts.range(1..).map(|(&h, _)| h)
    }

    ///
    /// Number of bases with height >= `h`, for every recorded height. Look up
    /// an arbitrary threshold with [`count_at_least`].
    ///
    pub fn tail_counts(&self) -> BTreeMap<u32, u64> {
        let mut running = 0u64;
        let mut tails = BTreeMap::new();
        for (&height, &n) in self.counts.iter().rev() {
            running += n;
            tails.insert(height, running);
        }
        tails
    }
}

/// Bases with height >= `h`, given the output of
/// [`HeightHistogram::tail_counts`].
pub fn count_at_least(tails: &BTreeMap<u32, u64>, h: u32) -> u64 {
    tails.range(h..).next().map_or(0, |(_, &n)| n)
}
