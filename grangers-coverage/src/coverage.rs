use fxhash::FxHashMap;
use rayon::prelude::*;

use grangers_core::errors::{Result, ValidationError};
use grangers_core::models::{AnnotatedIntervalSet, GroupedIntervals, Interval, IntervalSet, Rle};
use grangers_core::utils::cmp_seqnames;

///
/// Sweep `(position, delta)` events over the space `1..=space`.
///
/// Every interval contributes its weight at `start` and withdraws it at
/// `end + 1`; positions are `u64` so `u32::MAX + 1` is representable.
/// Stretches between events become runs, including the zero runs before,
/// between and after the intervals.
///
fn sweep(mut events: Vec<(u64, i64)>, space: u64) -> Rle<i64> {
    events.sort_unstable_by_key(|&(pos, _)| pos);

    let mut rle = Rle::new();
    let mut depth: i64 = 0;
    let mut prev: u64 = 1;

    for (pos, delta) in events {
        if pos > prev {
            rle.push_run(depth, (pos - prev) as usize);
            prev = pos;
        }
        depth += delta;
    }

    // remaining positions to the end of the space
    if prev <= space {
        rle.push_run(depth, (space + 1 - prev) as usize);
    }
    rle
}

/// The space to cover, or `None` when there is nothing to cover.
fn resolve_space(set: &IntervalSet, space_length: Option<u32>) -> Option<u32> {
    match space_length.or_else(|| set.max_end()) {
        Some(0) | None => None,
        Some(space) => Some(space),
    }
}

/// `(start, end + 1)` of an interval clipped to `1..=space`, `None` if it
/// lies entirely past the space.
fn clipped_events(interval: &Interval, space: u32) -> Option<(u64, u64)> {
    if interval.start() > space {
        return None;
    }
    Some((interval.start() as u64, interval.end().min(space) as u64 + 1))
}

///
/// Per-position depth of `set` over `1..=space_length`.
///
/// Without a `space_length` the space ends at the largest interval end, and
/// an empty set yields an empty [Rle]. Intervals reaching past an explicit
/// `space_length` are clipped to it.
///
/// # Examples
///
/// ```
/// use grangers_core::models::IntervalSet;
/// use grangers_coverage::coverage;
///
/// let set = IntervalSet::from_pairs(&[(3, 4)]).unwrap();
/// let depth = coverage(&set, Some(6));
/// assert_eq!(depth.expand(), vec![0, 0, 1, 1, 0, 0]);
/// ```
pub fn coverage(set: &IntervalSet, space_length: Option<u32>) -> Rle<u32> {
    let Some(space) = resolve_space(set, space_length) else {
        return Rle::new();
    };

    let mut events: Vec<(u64, i64)> = Vec::with_capacity(set.len() * 2);
    for interval in set {
        if let Some((start, stop)) = clipped_events(interval, space) {
            events.push((start, 1));
            events.push((stop, -1));
        }
    }

    // depth never exceeds the number of intervals
    sweep(events, space as u64).map(|&d| u32::try_from(d).unwrap_or(u32::MAX))
}

///
/// Like [coverage], but interval `i` adds `weights[i]` instead of one.
/// Weights may be negative.
///
pub fn weighted_coverage(
    set: &IntervalSet,
    weights: &[i64],
    space_length: Option<u32>,
) -> Result<Rle<i64>> {
    if weights.len() != set.len() {
        return Err(ValidationError::LengthMismatch {
            field: "weights".to_string(),
            expected: set.len(),
            found: weights.len(),
        });
    }
    let Some(space) = resolve_space(set, space_length) else {
        return Ok(Rle::new());
    };

    let mut events: Vec<(u64, i64)> = Vec::with_capacity(set.len() * 2);
    for (interval, &weight) in set.iter().zip(weights) {
        if let Some((start, stop)) = clipped_events(interval, space) {
            events.push((start, weight));
            events.push((stop, -weight));
        }
    }

    Ok(sweep(events, space as u64))
}

///
/// Coverage of the grangers containers.
///
/// `coverage_within` takes the extent of the coordinate space; `coverage`
/// derives it from the data.
///
pub trait Coverage {
    /// Extent of the coordinate space.
    type Space: ?Sized;
    type Output;

    fn coverage_within(&self, space: Option<&Self::Space>) -> Self::Output;

    fn coverage(&self) -> Self::Output {
        self.coverage_within(None)
    }
}

impl Coverage for IntervalSet {
    type Space = u32;
    type Output = Rle<u32>;

    fn coverage_within(&self, space: Option<&u32>) -> Rle<u32> {
        coverage(self, space.copied())
    }
}

impl Coverage for AnnotatedIntervalSet {
    /// seqname to seqlength
    type Space = FxHashMap<String, u32>;
    type Output = Vec<(String, Rle<u32>)>;

    ///
    /// One coverage vector per seqname, in seqlevel order. Seqnames missing
    /// from the seqlength map are bounded by their largest end; seqnames
    /// present only in the map follow in karyotypic order with zero
    /// coverage. Strand is ignored.
    ///
    fn coverage_within(&self, seqlengths: Option<&FxHashMap<String, u32>>) -> Self::Output {
        let mut levels = self.seqlevels();
        let mut per_seq: FxHashMap<&str, Vec<Interval>> = FxHashMap::default();
        for row in self.rows() {
            per_seq.entry(row.seqname).or_default().push(row.interval);
        }

        if let Some(lengths) = seqlengths {
            let mut extra: Vec<&String> = lengths
                .keys()
                .filter(|name| !per_seq.contains_key(name.as_str()))
                .collect();
            extra.sort_by(|a, b| cmp_seqnames(a, b));
            levels.extend(extra.into_iter().cloned());
        }
        log::debug!("computing coverage over {} sequences", levels.len());

        levels
            .into_par_iter()
            .map(|seqname| {
                let intervals = per_seq.get(seqname.as_str()).cloned().unwrap_or_default();
                let space = seqlengths.and_then(|l| l.get(&seqname)).copied();
                let depth = coverage(&IntervalSet::new(intervals), space);
                (seqname, depth)
            })
            .collect()
    }
}

impl Coverage for GroupedIntervals<IntervalSet> {
    /// shared by every group
    type Space = u32;
    type Output = GroupedIntervals<Rle<u32>>;

    ///
    /// Coverage of every group on its own, computed in parallel. The result
    /// for a group equals [coverage] of that group in isolation.
    ///
    fn coverage_within(&self, space: Option<&u32>) -> GroupedIntervals<Rle<u32>> {
        let space = space.copied();
        self.par_map_groups(|group| coverage(group, space))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grangers_core::models::Strand;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn set(pairs: &[(u32, u32)]) -> IntervalSet {
        IntervalSet::from_pairs(pairs).unwrap()
    }

    /// Coverage by counting every position directly.
    fn brute_force(set: &IntervalSet, space: u32) -> Vec<u32> {
        (1..=space)
            .map(|pos| set.iter().filter(|iv| iv.start() <= pos && pos <= iv.end()).count() as u32)
            .collect()
    }

    #[rstest]
    fn test_two_overlapping() {
        let depth = coverage(&set(&[(1, 3), (2, 5)]), None);
        assert_eq!(depth.values(), &[1, 2, 1]);
        assert_eq!(depth.lengths(), &[1, 2, 2]);
    }

    #[rstest]
    #[case(&[(1, 3), (2, 5)], None)]
    #[case(&[(4, 6), (4, 6), (10, 10)], None)]
    #[case(&[(3, 4), (5, 9), (1, 20)], Some(25))]
    #[case(&[(2, 2)], Some(2))]
    fn test_matches_brute_force(#[case] pairs: &[(u32, u32)], #[case] space: Option<u32>) {
        let s = set(pairs);
        let depth = coverage(&s, space);
        let space = space.unwrap_or_else(|| s.max_end().unwrap());
        assert_eq!(depth.expand(), brute_force(&s, space));
        assert_eq!(depth.len(), space as usize);
    }

    #[rstest]
    fn test_zero_runs_are_explicit() {
        let depth = coverage(&set(&[(3, 4), (7, 7)]), Some(9));
        assert_eq!(depth.values(), &[0, 1, 0, 1, 0]);
        assert_eq!(depth.lengths(), &[2, 2, 2, 1, 2]);
    }

    #[rstest]
    fn test_adjacent_intervals_merge_into_one_run() {
        let depth = coverage(&set(&[(1, 3), (4, 6)]), None);
        assert_eq!(depth.n_runs(), 1);
        assert_eq!(depth.values(), &[1]);
    }

    #[rstest]
    fn test_conservation() {
        let s = set(&[(1, 10), (5, 15), (5, 15), (100, 100), (20, 80)]);
        let depth = coverage(&s, None);
        assert_eq!(depth.sum(), s.total_width());
    }

    #[rstest]
    fn test_clipped_to_space() {
        let depth = coverage(&set(&[(2, 10), (20, 30)]), Some(5));
        assert_eq!(depth.expand(), vec![0, 1, 1, 1, 1]);
    }

    #[rstest]
    fn test_empty_inputs() {
        assert!(coverage(&IntervalSet::empty(), None).is_empty());
        assert!(coverage(&set(&[(1, 5)]), Some(0)).is_empty());

        let zeros = coverage(&IntervalSet::empty(), Some(4));
        assert_eq!(zeros.values(), &[0]);
        assert_eq!(zeros.lengths(), &[4]);
    }

    #[rstest]
    fn test_end_of_coordinate_space() {
        let depth = coverage(&set(&[(u32::MAX - 1, u32::MAX)]), None);
        assert_eq!(depth.values(), &[0, 1]);
        assert_eq!(depth.lengths(), &[(u32::MAX - 2) as usize, 2]);
    }

    #[rstest]
    fn test_weighted() {
        let s = set(&[(1, 3), (2, 5)]);
        let depth = weighted_coverage(&s, &[2, -1], None).unwrap();
        assert_eq!(depth.expand(), vec![2, 1, 1, -1, -1]);
        assert_eq!(depth.sum(), 2 * 3 - 4);

        assert!(matches!(
            weighted_coverage(&s, &[1], None),
            Err(ValidationError::LengthMismatch { .. })
        ));
    }

    #[rstest]
    fn test_trait_on_interval_set() {
        let s = set(&[(2, 3)]);
        assert_eq!(s.coverage().expand(), vec![0, 1, 1]);
        assert_eq!(s.coverage_within(Some(&4)).expand(), vec![0, 1, 1, 0]);
    }

    #[rstest]
    fn test_annotated_per_seqname() {
        let annotated = AnnotatedIntervalSet::new(
            set(&[(1, 2), (2, 3), (1, 1)]),
            vec!["chr2".into(), "chr2".into(), "chr1".into()],
            vec![Strand::Forward, Strand::Reverse, Strand::Unstranded],
            grangers_core::models::MetadataFrame::empty(3),
        )
        .unwrap();

        let by_seq = annotated.coverage();
        let names: Vec<&str> = by_seq.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["chr2", "chr1"]);
        assert_eq!(by_seq[0].1.expand(), vec![1, 2, 1]);
        assert_eq!(by_seq[1].1.expand(), vec![1]);

        let mut lengths: FxHashMap<String, u32> = FxHashMap::default();
        lengths.insert("chr1".into(), 3);
        lengths.insert("chrX".into(), 2);
        let by_seq = annotated.coverage_within(Some(&lengths));
        let names: Vec<&str> = by_seq.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["chr2", "chr1", "chrX"]);
        assert_eq!(by_seq[1].1.expand(), vec![1, 0, 0]);
        assert_eq!(by_seq[2].1.expand(), vec![0, 0]);
    }

    #[rstest]
    fn test_grouped_equals_isolated() {
        let groups = GroupedIntervals::from_pairs(vec![
            ("a".to_string(), set(&[(1, 3), (2, 5)])),
            ("b".to_string(), IntervalSet::empty()),
            ("c".to_string(), set(&[(10, 12)])),
        ])
        .unwrap();

        let grouped = groups.coverage();
        assert_eq!(grouped.names(), vec!["a", "b", "c"]);
        for (name, group) in groups.iter() {
            assert_eq!(grouped.get(name), Some(&coverage(group, None)), "group {name}");
        }

        let bounded = groups.coverage_within(Some(&12));
        for (_, depth) in bounded.iter() {
            assert_eq!(depth.len(), 12);
        }
    }
}
