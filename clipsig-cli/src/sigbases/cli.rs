use clap::{ArgAction, ArgGroup, Command, arg, value_parser};

use clipsig_fdr::consts::{DEFAULT_RANDOMISATIONS, DEFAULT_SPREAD, DEFAULT_THRESHOLD};

pub const SIGBASES_CMD: &str = "sigbases";
pub const DEFAULT_FEATURE: &str = "gene";
pub const STDIN: &str = "-";

pub fn create_sigbases_cli() -> Command {
    Command::new(SIGBASES_CMD)
        .about("Find crosslink bases with more signal than expected from randomised profiles.")
        .arg(arg!(--bam <bam>).help("Indexed BAM file of iCLIP reads"))
        .arg(
            arg!(--"plus-wig" <wig>)
                .visible_alias("wig")
                .help("BigWig of plus strand crosslinks, or of both strands without --minus-wig"),
        )
        .arg(arg!(--"minus-wig" <wig>).help("BigWig of minus strand crosslinks"))
        .arg(arg!(--bed <bed>).help("BED6 of crosslink sites, score is the crosslink count"))
        .group(
            ArgGroup::new("signal")
                .args(["bam", "plus-wig", "bed"])
                .required(true),
        )
        .arg(
            arg!(--gtf <gtf>)
                .help("Gene models as GTF, plain or gzipped; reads stdin when omitted")
                .default_value(STDIN),
        )
        .arg(
            arg!(--feature <feature>)
                .help("Group exons by gene or by transcript")
                .value_parser(["gene", "transcript"])
                .default_value(DEFAULT_FEATURE),
        )
        .arg(
            arg!(--spread <spread>)
                .help(format!(
                    "Bases either side summed into a base's height [default: {}]",
                    DEFAULT_SPREAD
                ))
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(--randomisations <randomisations>)
                .help(format!(
                    "Randomised profiles per interval [default: {}]",
                    DEFAULT_RANDOMISATIONS
                ))
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(--threshold <threshold>)
                .help(format!(
                    "Report bases with FDR at or below this value [default: {}]",
                    DEFAULT_THRESHOLD
                ))
                .value_parser(value_parser!(f64)),
        )
        .arg(
            arg!(--threads <threads>)
                .help("Worker threads; runs in a single thread when omitted")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--seed <seed>)
                .help("Seed for reproducible randomisations")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(--centre)
                .help("Use the read centre as crosslink site (BAM input)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"raw-fdr")
                .help("Report FDR per height without the step-down correction")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"per-interval")
                .help("Estimate FDR within each interval instead of over all intervals")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"no-introns")
                .help("Do not test intronic signal")
                .action(ArgAction::SetTrue),
        )
        .arg(arg!(--config <config>).help("TOML file with run settings; flags take precedence"))
        .arg(arg!(-o --output <output>).help("Output file; writes to stdout when omitted"))
}
