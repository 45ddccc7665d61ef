use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use clap::ArgMatches;

use clipsig_core::gtf::{Grouping, intervals_from_gtf};
use clipsig_fdr::consts::DEFAULT_THRESHOLD;
use clipsig_fdr::report::{filter_and_dedup, write_bedgraph};
use clipsig_fdr::{FdrConfig, FdrScope, ParallelExecutor, SequentialExecutor, compute_fdr};
use clipsig_signal::{SignalSources, make_accessor};

///
/// Settings from `--config`, overridden by whatever was given on the command
/// line.
///
fn config_from_matches(matches: &ArgMatches) -> Result<FdrConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => FdrConfig::try_from(Path::new(path))?,
        None => FdrConfig::default(),
    };

    if let Some(&spread) = matches.get_one::<u32>("spread") {
        config.spread = spread;
    }
    if let Some(&randomisations) = matches.get_one::<u32>("randomisations") {
        config.randomisations = randomisations;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = Some(seed);
    }
    if let Some(&threads) = matches.get_one::<usize>("threads") {
        config.threads = Some(threads);
    }
    if matches.get_flag("raw-fdr") {
        config.monotone = false;
    }
    if matches.get_flag("per-interval") {
        config.scope = FdrScope::PerInterval;
    }

    config.validate()?;
    Ok(config)
}

pub fn run_sigbases(matches: &ArgMatches) -> Result<()> {
    let config = config_from_matches(matches)?;

    let threshold = matches
        .get_one::<f64>("threshold")
        .copied()
        .unwrap_or(DEFAULT_THRESHOLD);
    if !(0.0..=1.0).contains(&threshold) {
        anyhow::bail!("FDR threshold must be between 0 and 1, got {}", threshold);
    }

    let feature = matches
        .get_one::<String>("feature")
        .expect("A feature type is required.");
    let grouping = Grouping::from_str(feature)?;

    let gtf = matches
        .get_one::<String>("gtf")
        .expect("A GTF path is required.");
    let include_introns = !matches.get_flag("no-introns");

    let sources = SignalSources {
        bam: matches.get_one::<String>("bam").cloned(),
        centre: matches.get_flag("centre"),
        plus_wig: matches.get_one::<String>("plus-wig").cloned(),
        minus_wig: matches.get_one::<String>("minus-wig").cloned(),
        bed: matches.get_one::<String>("bed").cloned(),
    };
    let accessor = make_accessor(&sources)?;

    let intervals = intervals_from_gtf(gtf, grouping, include_introns)?;
    log::info!("Read {} intervals from {}", intervals.len(), gtf);

    let run = match config.threads {
        Some(threads) => {
            let executor = ParallelExecutor::new(threads)?;
            compute_fdr(intervals, accessor.as_ref(), &config, &executor)?
        }
        None => compute_fdr(intervals, accessor.as_ref(), &config, &SequentialExecutor)?,
    };

    let records = filter_and_dedup(run.records, threshold);
    log::info!(
        "{} bases with FDR <= {} ({} intervals processed, {} skipped)",
        records.len(),
        threshold,
        run.processed,
        run.skipped
    );

    match matches.get_one::<String>("output") {
        Some(output) => {
            let mut writer = BufWriter::new(File::create(output)?);
            write_bedgraph(&records, &mut writer)?;
        }
        None => {
            let mut writer = BufWriter::new(io::stdout().lock());
            write_bedgraph(&records, &mut writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sigbases::cli::create_sigbases_cli;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::fs::read_to_string;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn get_test_path(file_name: &str) -> String {
        let path: PathBuf = std::env::current_dir()
            .unwrap()
            .join("../tests/data/clipsig")
            .join(file_name);
        path.to_string_lossy().into_owned()
    }

    fn parse(extra: &[&str]) -> ArgMatches {
        let gtf = get_test_path("genes.gtf");
        let bed = get_test_path("crosslinks.bed");
        let mut args = vec!["sigbases", "--gtf", gtf.as_str(), "--bed", bed.as_str()];
        args.extend_from_slice(extra);
        create_sigbases_cli().try_get_matches_from(args).unwrap()
    }

    #[rstest]
    fn test_flags_override_config_file() {
        let config_path = get_test_path("sigbases.toml");
        let matches = parse(&["--config", config_path.as_str(), "--spread", "3", "--raw-fdr"]);
        let config = config_from_matches(&matches).unwrap();

        assert_eq!(config.spread, 3);
        assert_eq!(config.randomisations, 250);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.scope, FdrScope::PerInterval);
        assert!(!config.monotone);
    }

    #[rstest]
    fn test_zero_randomisations_is_fatal() {
        let matches = parse(&["--randomisations", "0"]);
        assert!(config_from_matches(&matches).is_err());
    }

    #[rstest]
    fn test_threshold_out_of_range_is_fatal() {
        let matches = parse(&["--threshold", "1.5"]);
        assert!(run_sigbases(&matches).is_err());
    }

    #[rstest]
    #[case(&[])]
    #[case(&["--threads", "2"])]
    #[case(&["--per-interval"])]
    fn test_run_sigbases_finds_cluster(#[case] extra: &[&str]) {
        let dir = tempdir().unwrap();
        let output = dir.path().join("sigbases.bedgraph");
        let output_str = output.to_string_lossy().into_owned();

        let mut args = vec!["--seed", "11", "--output", output_str.as_str()];
        args.extend_from_slice(extra);
        run_sigbases(&parse(&args)).unwrap();

        let written = read_to_string(&output).unwrap();
        let line = written
            .lines()
            .find(|l| l.starts_with("chr1\t1042\t1043\t"))
            .expect("crosslink cluster not reported");

        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[4], "12");
        assert_eq!(fields[5], "+");
        assert!(fields[3].parse::<f64>().unwrap() > 1.3);
    }
}
