use clap::{Arg, ArgAction, Command, arg};

pub const RANGES_CMD: &str = "ranges";

pub const REDUCE_CMD: &str = "reduce";
pub const DISJOIN_CMD: &str = "disjoin";
pub const GAPS_CMD: &str = "gaps";

fn ignore_strand_arg() -> Arg {
    Arg::new("ignore-strand")
        .long("ignore-strand")
        .action(ArgAction::SetTrue)
        .help("Pool both strands and emit unstranded ranges")
}

pub fn create_ranges_cli() -> Command {
    Command::new(RANGES_CMD)
        .about("Interval set algebra operations on BED files.")
        .subcommand_required(true)
        .subcommand(
            Command::new(REDUCE_CMD)
                .about("Merge overlapping and adjacent intervals per sequence and strand.")
                .arg(arg!(--input <BED> "Input BED file").required(true))
                .arg(ignore_strand_arg())
                .arg(arg!(--output <OUTPUT> "Output BED file (default: stdout)").required(false)),
        )
        .subcommand(
            Command::new(DISJOIN_CMD)
                .about("Split intervals at every boundary into non-overlapping pieces.")
                .arg(arg!(--input <BED> "Input BED file").required(true))
                .arg(ignore_strand_arg())
                .arg(arg!(--output <OUTPUT> "Output BED file (default: stdout)").required(false)),
        )
        .subcommand(
            Command::new(GAPS_CMD)
                .about("Report uncovered stretches of every sequence.")
                .arg(arg!(--input <BED> "Input BED file").required(true))
                .arg(
                    Arg::new("chrom-sizes")
                        .long("chrom-sizes")
                        .required(false)
                        .help("Path to chrom.sizes file (default: bound by the largest end)"),
                )
                .arg(arg!(--output <OUTPUT> "Output BED file (default: stdout)").required(false)),
        )
}
