//! Significant crosslink bases by profile randomisation.
//!
//! Implements the significance test of Wang et al., PLoS Biol. 2010
//! (e1000530) for iCLIP data. Within each gene or transcript interval the
//! crosslinks within `spread` bases of a base are summed into its height. The
//! crosslinks of the interval are then thrown back onto it uniformly at random
//! many times to learn which heights arise by chance, and every observed
//! height gets a false discovery rate from the comparison.
//!
//! # Example
//!
//! ```no_run
//! use clipsig_core::gtf::{Grouping, intervals_from_gtf};
//! use clipsig_fdr::{FdrConfig, SequentialExecutor, compute_fdr};
//! use clipsig_signal::BedAccessor;
//!
//! let intervals = intervals_from_gtf("genes.gtf", Grouping::Gene, true).unwrap();
//! let accessor = BedAccessor::from_path("crosslinks.bed").unwrap();
//! let config = FdrConfig { seed: Some(1), ..Default::default() };
//!
//! let run = compute_fdr(intervals, &accessor, &config, &SequentialExecutor).unwrap();
//! for record in run.records.iter().filter(|r| r.fdr < 0.05) {
//!     println!("{}:{} {} {}", record.contig, record.position, record.height, record.fdr);
//! }
//! ```

pub mod config;
pub mod consts;
pub mod dispatch;
pub mod errors;
pub mod fdr;
pub mod histogram;
pub mod randomise;
pub mod report;
pub mod smoothing;

use std::panic::{AssertUnwindSafe, catch_unwind};

use indicatif::ProgressBar;
use rand::SeedableRng;
use rand::rngs::StdRng;

use clipsig_core::models::{Interval, Strand};
use clipsig_signal::{SignalAccessor, SignalError};

// re-exports
pub use self::config::{FdrConfig, FdrScope};
pub use self::dispatch::{Executor, ParallelExecutor, SequentialExecutor};
pub use self::errors::{ConfigError, FdrError};
pub use self::fdr::{FdrTable, ResultRecord, estimate_fdr};
pub use self::histogram::HeightHistogram;

/// Observed and randomised heights of one interval.
#[derive(Debug, Clone)]
pub struct IntervalHeights {
    pub contig: String,
    pub strand: Strand,
    /// Genomic position and height of every base with a nonzero height.
    pub sites: Vec<(u32, u32)>,
    pub observed: HeightHistogram,
    pub null: HeightHistogram,
    /// Set when FDR is estimated per interval.
    pub table: Option<FdrTable>,
}

/// Records of a run and how many intervals fed into them.
#[derive(Debug, Clone)]
pub struct FdrRun {
    pub records: Vec<ResultRecord>,
    pub processed: usize,
    /// Intervals whose signal could not be read or whose worker failed.
    /// They contribute nothing to the null.
    pub skipped: usize,
}

fn interval_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s.wrapping_add(index as u64)),
        None => StdRng::from_os_rng(),
    }
}

///
/// Observed heights and the randomised null of a single interval.
///
/// # Arguments
/// - interval: the gene or transcript model
/// - counts: its crosslink profile, one count per base
/// - config: randomisations, spread and FDR policy
/// - rng: random source for this interval only
///
pub fn interval_heights(
    interval: &Interval,
    counts: &[u32],
    config: &FdrConfig,
    rng: &mut StdRng,
) -> Result<IntervalHeights, FdrError> {
    let heights = smoothing::smooth(counts, config.spread);
    let observed = HeightHistogram::from_heights(&heights);
    let null = randomise::null_heights(counts, config.randomisations, config.spread, rng);

    let sites = interval
        .positions()
        .zip(heights.iter())
        .filter(|(_, h)| **h > 0)
        .map(|(pos, &h)| (pos, h))
        .collect();

    let table = match config.scope {
        FdrScope::PerInterval => Some(estimate_fdr(
            &observed,
            &null,
            config.randomisations,
            config.monotone,
        )?),
        FdrScope::Pooled => None,
    };

    Ok(IntervalHeights {
        contig: interval.contig().to_string(),
        strand: interval.strand,
        sites,
        observed,
        null,
        table,
    })
}

fn process_interval<A: SignalAccessor + ?Sized>(
    interval: &Interval,
    accessor: &A,
    config: &FdrConfig,
    rng: &mut StdRng,
) -> Result<IntervalHeights, String> {
    let counts = accessor
        .interval_counts(interval)
        .map_err(|e: SignalError| e.to_string())?;
    if counts.len() != interval.len() {
        return Err(format!(
            "signal has {} bases, interval has {}",
            counts.len(),
            interval.len()
        ));
    }
    interval_heights(interval, &counts, config, rng).map_err(|e| e.to_string())
}

///
/// Per-base FDR over every interval.
///
/// Each interval is processed independently on `executor`. Intervals whose
/// signal cannot be fetched, or whose worker panics, are logged and skipped
/// as a whole, so they never leave partial heights in the null. Observed and
/// null histograms are summed once all workers have returned, which makes the
/// result independent of completion order; with `config.seed` set it is
/// identical for sequential and parallel executors.
///
/// Records are returned sorted by contig, position and strand, one per
/// interval base with nonzero height.
///
pub fn compute_fdr<A, E>(
    intervals: Vec<Interval>,
    accessor: &A,
    config: &FdrConfig,
    executor: &E,
) -> Result<FdrRun, FdrError>
where
    A: SignalAccessor + ?Sized,
    E: Executor,
{
    config.validate()?;

    let total = intervals.len();
    log::info!(
        "Randomising {} intervals ({} randomisations, spread {})",
        total,
        config.randomisations,
        config.spread
    );

    let bar = ProgressBar::new(total as u64);
    let items: Vec<(usize, Interval)> = intervals.into_iter().enumerate().collect();

    let outcomes = executor.dispatch(items, |(index, interval)| {
        let mut rng = interval_rng(config.seed, index);
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            process_interval(&interval, accessor, config, &mut rng)
        }))
        .unwrap_or_else(|_| Err("worker panicked".to_string()));
        bar.inc(1);

        outcome.map_err(|reason| {
            log::warn!("Skipping {}: {}", interval.id, reason);
        })
    });
    bar.finish_and_clear();

    let mut observed = HeightHistogram::new();
    let mut null = HeightHistogram::new();
    let mut processed = Vec::with_capacity(outcomes.len());
    let mut skipped = 0usize;
    for outcome in outcomes {
        match outcome {
            Ok(heights) => {
                observed.merge(&heights.observed);
                null.merge(&heights.null);
                processed.push(heights);
            }
            Err(()) => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("{} of {} intervals were skipped", skipped, total);
    }

    let pooled = match config.scope {
        FdrScope::Pooled => estimate_fdr(&observed, &null, config.randomisations, config.monotone)?,
        FdrScope::PerInterval => FdrTable::default(),
    };

    let mut records = Vec::new();
    for heights in &processed {
        let table = heights.table.as_ref().unwrap_or(&pooled);
        records.extend(heights.sites.iter().map(|&(position, height)| ResultRecord {
            contig: heights.contig.clone(),
            position,
            strand: heights.strand,
            height,
            fdr: table.get(height),
        }));
    }
    report::sort_records(&mut records);

    log::info!(
        "Computed FDR for {} bases in {} intervals",
        records.len(),
        processed.len()
    );

    Ok(FdrRun {
        records,
        processed: processed.len(),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipsig_core::models::GenomicRange;
    use pretty_assertions::assert_eq;
    use rstest::*;

    /// Serves fixed profiles keyed by contig; fails on unknown contigs.
    struct FixedSignal {
        profiles: Vec<(String, Vec<u32>)>,
    }

    impl SignalAccessor for FixedSignal {
        fn counts(&self, range: &GenomicRange, _strand: Strand) -> Result<Vec<u32>, SignalError> {
            let (_, profile) = self
                .profiles
                .iter()
                .find(|(chr, _)| *chr == range.chr)
                .ok_or_else(|| SignalError::InvalidRegion(range.to_string()))?;
            Ok(profile[range.start as usize..range.end as usize].to_vec())
        }
    }

    fn make_interval(id: &str, chr: &str, len: u32) -> Interval {
        Interval::new(id, Strand::Plus, vec![GenomicRange::new(chr, 0, len).unwrap()]).unwrap()
    }

    fn spike_signal() -> FixedSignal {
        FixedSignal {
            profiles: vec![
                ("chr1".to_string(), vec![0, 0, 5, 0, 0, 0, 0, 0, 0, 0]),
                ("chr2".to_string(), vec![0; 20]),
            ],
        }
    }

    fn seeded(scope: FdrScope) -> FdrConfig {
        FdrConfig {
            randomisations: 100,
            spread: 1,
            seed: Some(42),
            scope,
            ..Default::default()
        }
    }

    #[rstest]
    #[case(FdrScope::Pooled)]
    #[case(FdrScope::PerInterval)]
    fn test_single_spike_is_significant(#[case] scope: FdrScope) {
        let intervals = vec![make_interval("spike", "chr1", 10)];
        let run = compute_fdr(intervals, &spike_signal(), &seeded(scope), &SequentialExecutor)
            .unwrap();

        assert_eq!(run.records.len(), 3);
        let peak = run.records.iter().find(|r| r.position == 2).unwrap();
        assert_eq!(peak.height, 5);
        assert!(peak.fdr < 0.1, "fdr was {}", peak.fdr);
    }

    #[rstest]
    fn test_empty_interval_has_no_records() {
        let intervals = vec![make_interval("flat", "chr2", 20)];
        let run = compute_fdr(
            intervals,
            &spike_signal(),
            &seeded(FdrScope::Pooled),
            &SequentialExecutor,
        )
        .unwrap();

        assert!(run.records.is_empty());
        assert_eq!(run.processed, 1);
        assert_eq!(run.skipped, 0);
    }

    #[rstest]
    fn test_failed_fetch_is_skipped() {
        let intervals = vec![
            make_interval("spike", "chr1", 10),
            make_interval("missing", "chrUn", 10),
        ];
        let run = compute_fdr(
            intervals,
            &spike_signal(),
            &seeded(FdrScope::Pooled),
            &SequentialExecutor,
        )
        .unwrap();

        assert_eq!(run.processed, 1);
        assert_eq!(run.skipped, 1);
        assert_eq!(run.records.len(), 3);
    }

    /// Panics on contig `boom`, returns one base too few on `short`.
    struct FaultySignal {
        inner: FixedSignal,
    }

    impl SignalAccessor for FaultySignal {
        fn counts(&self, range: &GenomicRange, strand: Strand) -> Result<Vec<u32>, SignalError> {
            match range.chr.as_str() {
                "boom" => panic!("reader crashed"),
                "short" => Ok(vec![1; range.width() as usize - 1]),
                _ => self.inner.counts(range, strand),
            }
        }
    }

    #[rstest]
    #[case("boom")]
    #[case("short")]
    fn test_faulty_interval_is_skipped(#[case] bad_contig: &str) {
        let signal = FaultySignal {
            inner: spike_signal(),
        };
        let intervals = vec![
            make_interval("spike", "chr1", 10),
            make_interval("bad", bad_contig, 10),
        ];
        let config = seeded(FdrScope::Pooled);

        let sequential =
            compute_fdr(intervals.clone(), &signal, &config, &SequentialExecutor).unwrap();
        let parallel = compute_fdr(
            intervals,
            &signal,
            &config,
            &ParallelExecutor::new(2).unwrap(),
        )
        .unwrap();

        for run in [&sequential, &parallel] {
            assert_eq!(run.processed, 1);
            assert_eq!(run.skipped, 1);
            assert_eq!(run.records.len(), 3);
            assert!(run.records.iter().all(|r| r.contig == "chr1"));
        }
        assert_eq!(sequential.records, parallel.records);

        // the faulty interval leaves no trace in the null
        let clean = compute_fdr(
            vec![make_interval("spike", "chr1", 10)],
            &signal,
            &config,
            &SequentialExecutor,
        )
        .unwrap();
        assert_eq!(sequential.records, clean.records);
    }

    #[rstest]
    fn test_no_intervals_is_empty_null() {
        let result = compute_fdr(
            vec![],
            &spike_signal(),
            &seeded(FdrScope::Pooled),
            &SequentialExecutor,
        );
        assert!(matches!(result, Err(FdrError::EmptyNullDistribution)));
    }

    #[rstest]
    fn test_zero_randomisations_rejected_before_work() {
        let config = FdrConfig {
            randomisations: 0,
            ..Default::default()
        };
        let result = compute_fdr(
            vec![make_interval("spike", "chr1", 10)],
            &spike_signal(),
            &config,
            &SequentialExecutor,
        );
        assert!(matches!(
            result,
            Err(FdrError::Config(ConfigError::NoRandomisations))
        ));
    }

    #[rstest]
    fn test_seeded_runs_are_identical() {
        let intervals = vec![
            make_interval("spike", "chr1", 10),
            make_interval("flat", "chr2", 20),
        ];
        let config = seeded(FdrScope::Pooled);
        let a = compute_fdr(intervals.clone(), &spike_signal(), &config, &SequentialExecutor)
            .unwrap();
        let b = compute_fdr(intervals.clone(), &spike_signal(), &config, &SequentialExecutor)
            .unwrap();
        let c = compute_fdr(
            intervals,
            &spike_signal(),
            &config,
            &ParallelExecutor::new(2).unwrap(),
        )
        .unwrap();

        assert_eq!(a.records, b.records);
        assert_eq!(a.records, c.records);
    }

    #[rstest]
    fn test_records_are_monotone_in_height() {
        let signal = FixedSignal {
            profiles: vec![(
                "chr1".to_string(),
                vec![0, 1, 0, 0, 3, 1, 0, 0, 0, 2, 0, 0, 7, 0, 0, 1, 0, 0, 0, 0, 1, 0, 4, 0],
            )],
        };
        let config = FdrConfig {
            spread: 2,
            seed: Some(3),
            ..Default::default()
        };
        let run = compute_fdr(
            vec![make_interval("busy", "chr1", 24)],
            &signal,
            &config,
            &SequentialExecutor,
        )
        .unwrap();

        for a in &run.records {
            assert!((0.0..=1.0).contains(&a.fdr));
            for b in &run.records {
                if a.height > b.height {
                    assert!(a.fdr <= b.fdr);
                }
            }
        }
    }
}
