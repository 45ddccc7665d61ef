///
/// Height of every base: the sum of the counts within `spread` bases either
/// side of it. Windows are truncated at the ends of the profile.
///
/// Runs in O(L) using a prefix sum, independent of `spread`.
///
pub fn smooth(counts: &[u32], spread: u32) -> Vec<u32> {
    let len = counts.len();
    let spread = spread as usize;

    let mut prefix: Vec<u64> = Vec::with_capacity(len + 1);
    prefix.push(0);
    let mut running = 0u64;
    for &count in counts {
        running += count as u64;
        prefix.push(running);
    }

    (0..len)
        .map(|i| {
            let lo = i.saturating_sub(spread);
            let hi = (i + spread + 1).min(len);
            u32::try_from(prefix[hi] - prefix[lo]).unwrap_or(u32::MAX)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_single_spike() {
        let counts = [0, 0, 5, 0, 0, 0, 0, 0, 0, 0];
        let heights = smooth(&counts, 1);
        assert_eq!(heights, vec![0, 5, 5, 5, 0, 0, 0, 0, 0, 0]);
    }

    #[rstest]
    fn test_truncated_windows_at_edges() {
        let counts = [1, 2, 3, 4];
        assert_eq!(smooth(&counts, 1), vec![3, 6, 9, 7]);
        assert_eq!(smooth(&counts, 10), vec![10, 10, 10, 10]);
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![7])]
    #[case(vec![3, 0, 0, 9, 1])]
    fn test_zero_spread_is_identity(#[case] counts: Vec<u32>) {
        assert_eq!(smooth(&counts, 0), counts);
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(50)]
    fn test_length_is_preserved(#[case] spread: u32) {
        let counts: Vec<u32> = (0..37).map(|i| (i * 7 % 5) as u32).collect();
        assert_eq!(smooth(&counts, spread).len(), counts.len());
    }

    #[rstest]
    fn test_interior_count_reaches_full_window() {
        // a single interior count shows up in exactly 2S+1 heights
        let spread = 3u32;
        let mut counts = vec![0u32; 20];
        counts[10] = 4;
        let heights = smooth(&counts, spread);

        let touched = heights.iter().filter(|&&h| h > 0).count();
        assert_eq!(touched, 2 * spread as usize + 1);
        assert_eq!(heights.iter().map(|&h| h as u64).sum::<u64>(), 4 * 7);
    }

    #[rstest]
    fn test_matches_naive_window_sum() {
        let counts: Vec<u32> = (0..64).map(|i| ((i * 31 + 7) % 4) as u32).collect();
        let spread = 5usize;
        let expected: Vec<u32> = (0..counts.len())
            .map(|i| {
                let lo = i.saturating_sub(spread);
                let hi = (i + spread).min(counts.len() - 1);
                counts[lo..=hi].iter().sum()
            })
            .collect();
        assert_eq!(smooth(&counts, spread as u32), expected);
    }
}
