use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const OVERLAP_CMD: &str = "overlap";

pub fn create_overlap_cli() -> Command {
    Command::new(OVERLAP_CMD)
        .about("Find overlaps between the rows of a query and a subject BED file.")
        .arg_required_else_help(true)
        .arg(arg!(-q --query <QUERY> "Query BED file").required(true))
        .arg(arg!(-s --subject <SUBJECT> "Subject BED file").required(true))
        .arg(
            Arg::new("type")
                .short('t')
                .long("type")
                .required(false)
                .default_value("any")
                .help("Overlap predicate: any, start, end, within or equal"),
        )
        .arg(
            Arg::new("max-gap")
                .long("max-gap")
                .required(false)
                .value_parser(value_parser!(u32))
                .help("Tolerated gap (any) or boundary distance (start, end, equal)"),
        )
        .arg(
            Arg::new("min-overlap")
                .long("min-overlap")
                .required(false)
                .value_parser(value_parser!(u32))
                .default_value("0")
                .help("Minimum number of shared positions"),
        )
        .arg(arg!(-e --backend <BACKEND> "Which index to use (ailist or bits)").required(false))
        .arg(
            Arg::new("count")
                .long("count")
                .action(ArgAction::SetTrue)
                .help("Print one hit count per query row instead of hit pairs"),
        )
        .arg(
            Arg::new("ignore-strand")
                .long("ignore-strand")
                .action(ArgAction::SetTrue)
                .help("Match rows regardless of strand"),
        )
}
