use clap::{Arg, ArgAction, Command, arg};

pub const COVERAGE_CMD: &str = "coverage";

pub fn create_coverage_cli() -> Command {
    Command::new(COVERAGE_CMD)
        .about("Per-position coverage of a BED file, one run-length vector per sequence.")
        .arg_required_else_help(true)
        .arg(arg!(--input <BED> "Input BED file").required(true))
        .arg(
            Arg::new("chrom-sizes")
                .long("chrom-sizes")
                .required(false)
                .help("Path to chrom.sizes file (default: bound by the largest end)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Emit run-length vectors as JSON instead of bedGraph"),
        )
}
