use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;
use fxhash::FxHashMap;

use grangers_core::models::AnnotatedIntervalSet;
use grangers_io::{BedWrite, read_bed, read_chrom_sizes, write_bed_to};
use grangers_ranges::GenomicRanges;

use super::cli::{DISJOIN_CMD, GAPS_CMD, REDUCE_CMD};

pub fn run_ranges(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some((REDUCE_CMD, m)) => {
            let set = load_input(m)?;
            let result = set.reduce(m.get_flag("ignore-strand"));
            write_output(&result, m.get_one::<String>("output"))
        }
        Some((DISJOIN_CMD, m)) => {
            let set = load_input(m)?;
            let result = set.disjoin(m.get_flag("ignore-strand"));
            write_output(&result, m.get_one::<String>("output"))
        }
        Some((GAPS_CMD, m)) => {
            let set = load_input(m)?;
            let seqlengths = match m.get_one::<String>("chrom-sizes") {
                Some(path) => read_chrom_sizes(path)
                    .with_context(|| format!("Failed to read chrom sizes from {}", path))?,
                None => FxHashMap::default(),
            };
            let result = set.gaps(&seqlengths)?;
            write_output(&result, m.get_one::<String>("output"))
        }
        _ => unreachable!("ranges subcommand not found"),
    }
}

pub(crate) fn load_bed(path: &str) -> Result<AnnotatedIntervalSet> {
    read_bed(path).with_context(|| format!("Failed to load BED file {}", path))
}

fn load_input(matches: &ArgMatches) -> Result<AnnotatedIntervalSet> {
    let path = matches
        .get_one::<String>("input")
        .context("--input is required")?;
    load_bed(path)
}

fn write_output(set: &AnnotatedIntervalSet, output: Option<&String>) -> Result<()> {
    match output {
        Some(p) => {
            let written = if p.ends_with(".gz") {
                set.write_bed_gz(p)
            } else {
                set.write_bed(p)
            };
            written.with_context(|| format!("Failed to write output to {}", p))?;
            log::info!("Output written to {}", p);
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            write_bed_to(set, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}
