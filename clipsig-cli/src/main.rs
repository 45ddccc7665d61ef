mod sigbases;

use anyhow::Result;
use clap::{ArgAction, Command, arg};
use log::Level;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "clipsig";
    pub const BIN_NAME: &str = "clipsig";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Significant crosslink sites in iCLIP data by randomisation of crosslink profiles.")
        .subcommand_required(true)
        .arg(
            arg!(--verbose)
                .help("Log debug messages")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(sigbases::cli::create_sigbases_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    let level = if matches.get_flag("verbose") {
        Level::Debug
    } else {
        Level::Info
    };
    simple_logger::init_with_level(level)?;

    match matches.subcommand() {
        //
        // SIGNIFICANT BASES
        //
        Some((sigbases::cli::SIGBASES_CMD, matches)) => {
            sigbases::handlers::run_sigbases(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
