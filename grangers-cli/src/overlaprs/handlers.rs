use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;

use grangers_overlaprs::{OverlapOptions, OverlapType, OverlapperType, find_overlaps_annotated};

use crate::ranges::handlers::load_bed;

fn overlap_options(matches: &ArgMatches) -> Result<OverlapOptions> {
    let overlap_type: OverlapType = matches
        .get_one::<String>("type")
        .map(|s| s.parse::<OverlapType>())
        .transpose()?
        .unwrap_or_default();

    let index: OverlapperType = matches
        .get_one::<String>("backend")
        .map(|s| s.parse::<OverlapperType>())
        .transpose()?
        .unwrap_or_default();

    let mut options = OverlapOptions::new(overlap_type).with_index(index);
    if let Some(&max_gap) = matches.get_one::<u32>("max-gap") {
        options = options.with_max_gap(max_gap);
    }
    if let Some(&min_overlap) = matches.get_one::<u32>("min-overlap") {
        options = options.with_min_overlap(min_overlap);
    }
    options.validate()?;
    Ok(options)
}

pub fn run_overlaprs(matches: &ArgMatches) -> Result<()> {
    let query_file = matches
        .get_one::<String>("query")
        .context("A path to a query file is required.")?;
    let subject_file = matches
        .get_one::<String>("subject")
        .context("A path to a subject file is required.")?;

    let options = overlap_options(matches)?;
    let ignore_strand = matches.get_flag("ignore-strand");

    let query = load_bed(query_file)?;
    let subject = load_bed(subject_file)?;

    let hits = find_overlaps_annotated(&query, &subject, &options, ignore_strand)?;
    log::info!(
        "{} hits between {} query and {} subject ranges",
        hits.len(),
        query.len(),
        subject.len()
    );

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    if matches.get_flag("count") {
        for count in hits.count_per_query() {
            writeln!(writer, "{}", count)?;
        }
    } else {
        for (q, s) in hits.iter() {
            writeln!(writer, "{}\t{}", q, s)?;
        }
    }
    writer.flush()?;

    Ok(())
}
