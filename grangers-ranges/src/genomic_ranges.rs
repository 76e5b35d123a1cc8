//! Strand-aware interval algebra for annotated interval sets.

use fxhash::{FxHashMap, FxHashSet};

use grangers_core::errors::Result;
use grangers_core::models::{AnnotatedIntervalSet, Interval, IntervalSet, Strand};
use grangers_core::utils::cmp_seqnames;

use crate::interval_ranges::{IntervalRanges, checked_interval};

///
/// GenomicRanges-style operations on an [AnnotatedIntervalSet].
///
/// Normalizing operations work independently on every `(seqname, strand)`
/// stratum and drop the metadata columns, since merged rows have no single
/// value to carry forward. Row-wise operations keep every parallel array.
///
pub trait GenomicRanges {
    /// [IntervalRanges::reduce] per seqname and strand. With `ignore_strand`,
    /// strands are pooled and the output is unstranded.
    fn reduce(&self, ignore_strand: bool) -> AnnotatedIntervalSet;

    /// [IntervalRanges::disjoin] per seqname and strand.
    fn disjoin(&self, ignore_strand: bool) -> AnnotatedIntervalSet;

    /// Uncovered stretches of every seqname between 1 and its seqlength, in
    /// karyotypic seqname order. Seqnames missing from `seqlengths` are
    /// bounded by their largest end; seqnames without any range are a single
    /// gap spanning the whole sequence.
    fn gaps(&self, seqlengths: &FxHashMap<String, u32>) -> Result<AnnotatedIntervalSet>;

    /// Promoter regions relative to the transcription start: `start` on `+`
    /// and `*` rows, `end` on `-` rows.
    fn promoters(&self, upstream: u32, downstream: u32) -> Result<AnnotatedIntervalSet>;

    fn shift(&self, offset: i64) -> Result<AnnotatedIntervalSet>;
}

/// Rows bucketed by `(seqname, strand)`, in sorted stratum order.
fn strata(set: &AnnotatedIntervalSet, ignore_strand: bool) -> Vec<((String, Strand), IntervalSet)> {
    let mut buckets: FxHashMap<(String, Strand), Vec<Interval>> = FxHashMap::default();
    for row in set.rows() {
        let strand = if ignore_strand { Strand::Unstranded } else { row.strand };
        buckets
            .entry((row.seqname.to_string(), strand))
            .or_default()
            .push(row.interval);
    }

    let mut strata: Vec<((String, Strand), IntervalSet)> = buckets
        .into_iter()
        .map(|(key, intervals)| (key, IntervalSet::new(intervals)))
        .collect();
    strata.sort_by(|((sa, ta), _), ((sb, tb), _)| cmp_seqnames(sa, sb).then_with(|| ta.cmp(tb)));
    log::debug!("split {} rows into {} strata", set.len(), strata.len());
    strata
}

/// Reassemble per-stratum results into one metadata-free set.
fn assemble<F>(parts: Vec<((String, Strand), IntervalSet)>, op: F) -> AnnotatedIntervalSet
where
    F: Fn(&IntervalSet) -> IntervalSet,
{
    AnnotatedIntervalSet::from_blocks(
        parts
            .into_iter()
            .map(|((seqname, strand), ranges)| (seqname, strand, op(&ranges)))
            .collect(),
    )
}

impl GenomicRanges for AnnotatedIntervalSet {
    fn reduce(&self, ignore_strand: bool) -> AnnotatedIntervalSet {
        assemble(strata(self, ignore_strand), |s| s.reduce())
    }

    fn disjoin(&self, ignore_strand: bool) -> AnnotatedIntervalSet {
        assemble(strata(self, ignore_strand), |s| s.disjoin())
    }

    fn gaps(&self, seqlengths: &FxHashMap<String, u32>) -> Result<AnnotatedIntervalSet> {
        let mut per_seq: Vec<(String, IntervalSet)> = strata(self, true)
            .into_iter()
            .map(|((seqname, _), ranges)| (seqname, ranges))
            .collect();

        // sequences without any range are one gap end to end
        let covered: FxHashSet<&str> = per_seq.iter().map(|(s, _)| s.as_str()).collect();
        let empty: Vec<(String, IntervalSet)> = seqlengths
            .iter()
            .filter(|&(name, &len)| len > 0 && !covered.contains(name.as_str()))
            .map(|(name, _)| (name.clone(), IntervalSet::empty()))
            .collect();
        per_seq.extend(empty);
        per_seq.sort_by(|(a, _), (b, _)| cmp_seqnames(a, b));

        let mut blocks: Vec<(String, Strand, IntervalSet)> = Vec::with_capacity(per_seq.len());
        for (seqname, ranges) in per_seq {
            let end = match seqlengths.get(&seqname).copied().or(ranges.max_end()) {
                Some(end) => end,
                None => continue,
            };
            let out = ranges.gaps(1, end)?;
            blocks.push((seqname, Strand::Unstranded, out));
        }
        Ok(AnnotatedIntervalSet::from_blocks(blocks))
    }

    fn promoters(&self, upstream: u32, downstream: u32) -> Result<AnnotatedIntervalSet> {
        let (up, down) = (upstream as i64, downstream as i64);
        let ranges = self
            .rows()
            .map(|row| {
                let (start, end) = (row.interval.start() as i64, row.interval.end() as i64);
                match row.strand {
                    Strand::Reverse => checked_interval(row.index, (end - down + 1).max(1), end + up),
                    _ => checked_interval(row.index, (start - up).max(1), start + down - 1),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        self.with_ranges(IntervalSet::new(ranges))
    }

    fn shift(&self, offset: i64) -> Result<AnnotatedIntervalSet> {
        self.with_ranges(self.ranges().shift(offset)?)
    }
}
