use std::path::PathBuf;

use grangers::core::models::{AnnotatedIntervalSet, IntervalSet, MetaValue, Strand};
use grangers::coverage::Coverage;
use grangers::io::{BedWrite, read_bed, read_chrom_sizes, write_rle_bedgraph};
use grangers::overlaprs::{OverlapOptions, count_overlaps_annotated, find_overlaps_annotated};
use grangers::ranges::GenomicRanges;

use pretty_assertions::assert_eq;
use rstest::*;

fn data_path(file_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(file_name)
}

#[fixture]
fn peaks() -> AnnotatedIntervalSet {
    read_bed(data_path("peaks.bed")).unwrap()
}

#[fixture]
fn genes() -> AnnotatedIntervalSet {
    read_bed(data_path("genes.bed")).unwrap()
}

#[rstest]
fn test_read_fixture(peaks: AnnotatedIntervalSet) {
    assert_eq!(peaks.len(), 6);
    assert_eq!(peaks.seqlevels(), vec!["chr1", "chr2", "chrX"]);

    let first = peaks.row(0).unwrap();
    assert_eq!((first.interval.start(), first.interval.end()), (100, 200));
    assert_eq!(first.strand, Strand::Forward);
    assert_eq!(first.meta("name"), Some(MetaValue::Str("p1")));
    assert_eq!(first.meta("score"), Some(MetaValue::Float(10.0)));
    assert_eq!(peaks.strand(3), Some(Strand::Unstranded));
}

#[rstest]
fn test_overlaps_respect_seqname_and_strand(peaks: AnnotatedIntervalSet, genes: AnnotatedIntervalSet) {
    let options = OverlapOptions::default();
    let hits = find_overlaps_annotated(&peaks, &genes, &options, false).unwrap();
    assert_eq!(hits.to_pairs(), vec![(0, 0), (3, 2), (4, 2)]);

    let counts = count_overlaps_annotated(&peaks, &genes, &options, true).unwrap();
    assert_eq!(counts, vec![1, 0, 0, 1, 1, 0]);
}

#[rstest]
fn test_reduce_fixture(peaks: AnnotatedIntervalSet) {
    let stranded = peaks.reduce(false);
    assert_eq!(stranded.len(), 6);

    let pooled = peaks.reduce(true);
    assert_eq!(
        pooled.ranges(),
        &IntervalSet::from_pairs(&[(100, 350), (1, 50), (1000, 1100), (501, 600)]).unwrap()
    );
    assert!(pooled.strands().values().iter().all(|s| *s == Strand::Unstranded));
}

#[rstest]
fn test_coverage_fixture(peaks: AnnotatedIntervalSet) {
    let per_seq = peaks.coverage();
    let summary: Vec<(&str, usize, u64)> = per_seq
        .iter()
        .map(|(name, depth)| (name.as_str(), depth.len(), depth.sum()))
        .collect();
    assert_eq!(
        summary,
        vec![("chr1", 350, 303), ("chr2", 1100, 151), ("chrX", 600, 100)]
    );

    let sizes = read_chrom_sizes(data_path("chrom.sizes")).unwrap();
    let per_seq = peaks.coverage_within(Some(&sizes));
    let names: Vec<&str> = per_seq.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["chr1", "chr2", "chrX", "chr3"]);
    assert_eq!(per_seq[0].1.len(), 1000);
    assert_eq!(per_seq[3].1.values(), &[0]);
}

#[rstest]
fn test_bedgraph_export(peaks: AnnotatedIntervalSet) {
    let per_seq = peaks.coverage();
    let (seqname, depth) = &per_seq[2];

    let mut out: Vec<u8> = Vec::new();
    write_rle_bedgraph(seqname, depth, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "chrX\t0\t500\t0\nchrX\t500\t600\t1\n"
    );
}

#[rstest]
fn test_gz_round_trip(peaks: AnnotatedIntervalSet) {
    let tempdir = tempfile::tempdir().unwrap();
    let path = tempdir.path().join("peaks.bed.gz");

    peaks.write_bed_gz(&path).unwrap();
    assert_eq!(read_bed(&path).unwrap(), peaks);
}
