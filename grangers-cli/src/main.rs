mod coverage;
mod overlaprs;
mod ranges;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "grangers";
    pub const BIN_NAME: &str = "grangers";
    pub const VERBOSE_ARG: &str = "verbose";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Interval algebra, overlaps and coverage for genomic ranges stored as BED files.")
        .subcommand_required(true)
        .arg(
            Arg::new(consts::VERBOSE_ARG)
                .short('v')
                .long(consts::VERBOSE_ARG)
                .action(ArgAction::Count)
                .global(true)
                .help("Increase logging verbosity (-v info, -vv debug)"),
        )
        .subcommand(ranges::cli::create_ranges_cli())
        .subcommand(overlaprs::cli::create_overlap_cli())
        .subcommand(coverage::cli::create_coverage_cli())
}

fn init_logging(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_count(consts::VERBOSE_ARG));
    log::debug!("{} {}", consts::PKG_NAME, consts::VERSION);

    match matches.subcommand() {
        //
        // RANGES
        //
        Some((ranges::cli::RANGES_CMD, matches)) => {
            ranges::handlers::run_ranges(matches)?;
        }

        //
        // OVERLAPS
        //
        Some((overlaprs::cli::OVERLAP_CMD, matches)) => {
            overlaprs::handlers::run_overlaprs(matches)?;
        }

        //
        // COVERAGE
        //
        Some((coverage::cli::COVERAGE_CMD, matches)) => {
            coverage::handlers::run_coverage(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[test]
    fn test_verbose_is_global() {
        let matches = build_parser()
            .try_get_matches_from(["grangers", "coverage", "--input", "a.bed", "-vv"])
            .unwrap();
        assert_eq!(matches.get_count(consts::VERBOSE_ARG), 2);
    }
}
