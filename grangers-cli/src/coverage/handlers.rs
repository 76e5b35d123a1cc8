use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::Serialize;

use grangers_core::models::Rle;
use grangers_coverage::Coverage;
use grangers_io::{read_chrom_sizes, write_rle_bedgraph};

use crate::ranges::handlers::load_bed;

/// JSON record for one sequence.
#[derive(Serialize)]
struct SeqCoverage<'a> {
    seqname: &'a str,
    coverage: &'a Rle<u32>,
}

pub fn run_coverage(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .context("--input is required")?;
    let set = load_bed(input)?;

    let seqlengths = match matches.get_one::<String>("chrom-sizes") {
        Some(path) => Some(
            read_chrom_sizes(path)
                .with_context(|| format!("Failed to read chrom sizes from {}", path))?,
        ),
        None => None,
    };
    let per_seq = set.coverage_within(seqlengths.as_ref());

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    if matches.get_flag("json") {
        let records: Vec<SeqCoverage> = per_seq
            .iter()
            .map(|(seqname, coverage)| SeqCoverage { seqname, coverage })
            .collect();
        serde_json::to_writer_pretty(&mut writer, &records)?;
        writeln!(writer)?;
    } else {
        for (seqname, coverage) in &per_seq {
            write_rle_bedgraph(seqname, coverage, &mut writer)?;
        }
    }
    writer.flush()?;

    Ok(())
}
