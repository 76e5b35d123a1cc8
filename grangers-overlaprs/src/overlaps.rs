//! Overlap predicates and the query-against-subject search.

use std::fmt::{self, Display};
use std::str::FromStr;

use grangers_core::errors::{Result, ValidationError};
use grangers_core::models::{GroupedIntervals, Interval, IntervalSet};

use crate::hits::Hits;
use crate::traits::{Entry, Overlapper};
use crate::{AIList, Bits, OverlapperType};

/// Which relation between a query and a subject interval counts as a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapType {
    /// at least one shared position
    #[default]
    Any,
    /// starts coincide
    Start,
    /// ends coincide
    End,
    /// query lies entirely inside the subject
    Within,
    /// starts and ends coincide
    Equal,
}

impl FromStr for OverlapType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "any" => Ok(OverlapType::Any),
            "start" => Ok(OverlapType::Start),
            "end" => Ok(OverlapType::End),
            "within" => Ok(OverlapType::Within),
            "equal" => Ok(OverlapType::Equal),
            other => Err(ValidationError::UnknownOverlapType(other.to_string())),
        }
    }
}

impl Display for OverlapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OverlapType::Any => "any",
            OverlapType::Start => "start",
            OverlapType::End => "end",
            OverlapType::Within => "within",
            OverlapType::Equal => "equal",
        };
        write!(f, "{name}")
    }
}

///
/// Options for an overlap query.
///
/// * `max_gap`: for [`OverlapType::Any`], intervals separated by at most this
///   many uncovered positions also hit (`Some(0)` admits adjacent intervals).
///   For `Start`, `End` and `Equal` it is the tolerated coordinate
///   difference. Ignored by `Within`.
/// * `min_overlap`: a hit must share at least this many positions. Cannot be
///   combined with `max_gap`.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlapOptions {
    pub overlap_type: OverlapType,
    pub max_gap: Option<u32>,
    pub min_overlap: u32,
    pub index: OverlapperType,
}

impl OverlapOptions {
    pub fn new(overlap_type: OverlapType) -> Self {
        OverlapOptions {
            overlap_type,
            ..Default::default()
        }
    }

    pub fn with_max_gap(mut self, max_gap: u32) -> Self {
        self.max_gap = Some(max_gap);
        self
    }

    pub fn with_min_overlap(mut self, min_overlap: u32) -> Self {
        self.min_overlap = min_overlap;
        self
    }

    pub fn with_index(mut self, index: OverlapperType) -> Self {
        self.index = index;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_overlap > 0 && self.max_gap.is_some() {
            return Err(ValidationError::InvalidArgument(
                "min_overlap and max_gap cannot be combined".to_string(),
            ));
        }
        Ok(())
    }

    /// The closed window an index lookup has to cover so that every
    /// candidate satisfying the predicate is returned.
    pub(crate) fn search_window(&self, query: &Interval) -> (u32, u32) {
        let widen = match self.overlap_type {
            OverlapType::Any => self.max_gap.map_or(0, |g| g.saturating_add(1)),
            OverlapType::Within => 0,
            _ => self.max_gap.unwrap_or(0),
        };
        (
            query.start().saturating_sub(widen).max(1),
            query.end().saturating_add(widen),
        )
    }

    ///
    /// Does `subject` hit `query` under these options?
    ///
    pub fn matches(&self, query: &Interval, subject: &Interval) -> bool {
        let tolerance = self.max_gap.unwrap_or(0);
        let close = |a: u32, b: u32| a.abs_diff(b) <= tolerance;

        let related = match self.overlap_type {
            OverlapType::Any => match query.gap_to(subject) {
                None => true,
                Some(gap) => self.max_gap.is_some_and(|g| gap <= g),
            },
            OverlapType::Start => close(query.start(), subject.start()),
            OverlapType::End => close(query.end(), subject.end()),
            OverlapType::Within => subject.contains(query),
            OverlapType::Equal => {
                close(query.start(), subject.start()) && close(query.end(), subject.end())
            }
        };

        related && (self.min_overlap == 0 || query.overlap_width(subject) >= self.min_overlap)
    }
}

/// Build an index of the given kind over `entries`.
pub fn build_overlapper(
    entries: Vec<Entry<u32, usize>>,
    index: OverlapperType,
) -> Box<dyn Overlapper<u32, usize>> {
    log::debug!("building {index:?} index over {} intervals", entries.len());
    match index {
        OverlapperType::AIList => Box::new(AIList::build(entries)),
        OverlapperType::Bits => Box::new(Bits::build(entries)),
    }
}

/// Build an index over `subject`; every entry carries its row index.
pub fn build_index(subject: &IntervalSet, index: OverlapperType) -> Box<dyn Overlapper<u32, usize>> {
    let entries: Vec<Entry<u32, usize>> = subject
        .iter()
        .enumerate()
        .map(|(j, iv)| Entry {
            start: iv.start(),
            end: iv.end(),
            val: j,
        })
        .collect();
    build_overlapper(entries, index)
}

///
/// Subject rows hit by `query`, ascending, drawn from `index` and filtered
/// through the predicate and an extra row filter.
///
pub(crate) fn subjects_for<F>(
    index: &dyn Overlapper<u32, usize>,
    query: &Interval,
    options: &OverlapOptions,
    keep: F,
) -> Vec<usize>
where
    F: Fn(usize) -> bool,
{
    let (lo, hi) = options.search_window(query);
    let mut found: Vec<usize> = index
        .find_iter(lo, hi)
        .filter(|e| options.matches(query, &Interval::new_unchecked(e.start, e.end)))
        .map(|e| e.val)
        .filter(|&j| keep(j))
        .collect();
    found.sort_unstable();
    found
}

///
/// All `(query, subject)` pairs related under `options`, ordered by query
/// index then subject index. Queries without a match do not appear.
///
/// # Examples
///
/// ```
/// use grangers_core::models::IntervalSet;
/// use grangers_overlaprs::{OverlapOptions, OverlapType, find_overlaps};
///
/// let query = IntervalSet::from_pairs(&[(1, 2), (5, 6)]).unwrap();
/// let subject = IntervalSet::from_pairs(&[(1, 4), (3, 6)]).unwrap();
///
/// let hits = find_overlaps(&query, &subject, &OverlapOptions::new(OverlapType::Any)).unwrap();
/// assert_eq!(hits.to_pairs(), vec![(0, 0), (1, 1)]);
/// ```
pub fn find_overlaps(
    query: &IntervalSet,
    subject: &IntervalSet,
    options: &OverlapOptions,
) -> Result<Hits> {
    options.validate()?;
    let index = build_index(subject, options.index);

    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for (i, q) in query.iter().enumerate() {
        for j in subjects_for(index.as_ref(), q, options, |_| true) {
            pairs.push((i, j));
        }
    }

    Ok(Hits::from_sorted(pairs, query.len(), subject.len()))
}

/// Number of subjects hit by every query row; always derived from
/// [`find_overlaps`].
pub fn count_overlaps(
    query: &IntervalSet,
    subject: &IntervalSet,
    options: &OverlapOptions,
) -> Result<Vec<usize>> {
    Ok(find_overlaps(query, subject, options)?.count_per_query())
}

/// Query rows with at least one hit, in their original order.
pub fn subset_by_overlaps(
    query: &IntervalSet,
    subject: &IntervalSet,
    options: &OverlapOptions,
) -> Result<IntervalSet> {
    let counts = count_overlaps(query, subject, options)?;
    let keep: Vec<usize> = counts
        .iter()
        .enumerate()
        .filter_map(|(i, &c)| (c > 0).then_some(i))
        .collect();
    query.take(&keep)
}

///
/// Overlaps where each query element is a whole group: a group hits a
/// subject interval when any of its ranges does. Query indices in the
/// result are group positions.
///
pub fn find_overlaps_grouped(
    query: &GroupedIntervals<IntervalSet>,
    subject: &IntervalSet,
    options: &OverlapOptions,
) -> Result<Hits> {
    let (flat, origin) = query.unlist_with_provenance();
    let hits = find_overlaps(&flat, subject, options)?;
    let pairs: Vec<(usize, usize)> = hits.iter().map(|(q, s)| (origin[q], s)).collect();
    Ok(Hits::from_unsorted(pairs, query.len(), subject.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn set(pairs: &[(u32, u32)]) -> IntervalSet {
        IntervalSet::from_pairs(pairs).unwrap()
    }

    #[fixture]
    fn query() -> IntervalSet {
        IntervalSet::from_start_width(&[(1, 2), (5, 2), (3, 4), (4, 6)]).unwrap()
    }

    #[fixture]
    fn subject() -> IntervalSet {
        set(&[(1, 4), (3, 6), (5, 9), (6, 9)])
    }

    #[rstest]
    #[case(OverlapperType::AIList)]
    #[case(OverlapperType::Bits)]
    fn test_type_start(query: IntervalSet, subject: IntervalSet, #[case] index: OverlapperType) {
        let options = OverlapOptions::new(OverlapType::Start).with_index(index);
        let hits = find_overlaps(&query, &subject, &options).unwrap();
        assert_eq!(hits.to_pairs(), vec![(0, 0), (1, 2), (2, 1)]);
    }

    #[rstest]
    fn test_count_any(query: IntervalSet, subject: IntervalSet) {
        let counts = count_overlaps(&query, &subject, &OverlapOptions::default()).unwrap();
        assert_eq!(counts, vec![1, 3, 4, 4]);
    }

    #[rstest]
    fn test_hits_ordered(query: IntervalSet, subject: IntervalSet) {
        let hits = find_overlaps(&query, &subject, &OverlapOptions::default()).unwrap();
        let pairs = hits.to_pairs();
        let mut sorted = pairs.clone();
        sorted.sort();
        assert_eq!(pairs, sorted);
        assert_eq!(hits.query_len(), 4);
        assert_eq!(hits.subject_len(), 4);
    }

    #[rstest]
    #[case(OverlapType::End, vec![(1, 1), (2, 1), (3, 2), (3, 3)])]
    #[case(OverlapType::Within, vec![(0, 0), (1, 1), (1, 2), (2, 1)])]
    #[case(OverlapType::Equal, vec![(2, 1)])]
    fn test_other_types(
        query: IntervalSet,
        subject: IntervalSet,
        #[case] overlap_type: OverlapType,
        #[case] expected: Vec<(usize, usize)>,
    ) {
        let hits = find_overlaps(&query, &subject, &OverlapOptions::new(overlap_type)).unwrap();
        assert_eq!(hits.to_pairs(), expected);
    }

    #[rstest]
    fn test_adjacency_is_not_overlap_by_default() {
        let a = set(&[(1, 3)]);
        let b = set(&[(4, 6)]);
        assert_eq!(count_overlaps(&a, &b, &OverlapOptions::default()).unwrap(), vec![0]);
        assert_eq!(count_overlaps(&b, &a, &OverlapOptions::default()).unwrap(), vec![0]);

        let touching = OverlapOptions::default().with_max_gap(0);
        assert_eq!(count_overlaps(&a, &b, &touching).unwrap(), vec![1]);
        assert_eq!(count_overlaps(&b, &a, &touching).unwrap(), vec![1]);
    }

    #[rstest]
    #[case(1, vec![0])]
    #[case(2, vec![1])]
    #[case(5, vec![1])]
    fn test_max_gap(#[case] max_gap: u32, #[case] expected: Vec<usize>) {
        // two uncovered positions (4 and 5) in between
        let a = set(&[(1, 3)]);
        let b = set(&[(6, 9)]);
        let options = OverlapOptions::default().with_max_gap(max_gap);
        assert_eq!(count_overlaps(&a, &b, &options).unwrap(), expected);
    }

    #[rstest]
    fn test_min_overlap(query: IntervalSet, subject: IntervalSet) {
        let options = OverlapOptions::default().with_min_overlap(3);
        // queries of width 2 can never qualify
        let hits = find_overlaps(&query, &subject, &options).unwrap();
        assert_eq!(hits.to_pairs(), vec![(2, 1), (3, 1), (3, 2), (3, 3)]);
    }

    #[rstest]
    fn test_min_overlap_with_max_gap_rejected(query: IntervalSet, subject: IntervalSet) {
        let options = OverlapOptions::default().with_min_overlap(1).with_max_gap(2);
        assert!(matches!(
            find_overlaps(&query, &subject, &options),
            Err(ValidationError::InvalidArgument(_))
        ));
    }

    #[rstest]
    fn test_start_tolerance() {
        let q = set(&[(10, 20)]);
        let s = set(&[(8, 30), (12, 13), (14, 15)]);
        let options = OverlapOptions::new(OverlapType::Start).with_max_gap(2);
        assert_eq!(
            find_overlaps(&q, &s, &options).unwrap().to_pairs(),
            vec![(0, 0), (0, 1)]
        );
    }

    #[rstest]
    fn test_parse_overlap_type() {
        assert_eq!("within".parse::<OverlapType>().unwrap(), OverlapType::Within);
        assert_eq!(
            "bogus".parse::<OverlapType>(),
            Err(ValidationError::UnknownOverlapType("bogus".to_string()))
        );
        assert_eq!(OverlapType::Equal.to_string(), "equal");
    }

    #[rstest]
    fn test_empty_inputs(subject: IntervalSet) {
        let hits = find_overlaps(&IntervalSet::empty(), &subject, &OverlapOptions::default()).unwrap();
        assert!(hits.is_empty());
        let counts =
            count_overlaps(&subject, &IntervalSet::empty(), &OverlapOptions::default()).unwrap();
        assert_eq!(counts, vec![0; 4]);
    }

    #[rstest]
    fn test_subset_by_overlaps() {
        let q = set(&[(1, 2), (10, 12), (5, 6)]);
        let s = set(&[(6, 11)]);
        assert_eq!(
            subset_by_overlaps(&q, &s, &OverlapOptions::default()).unwrap(),
            set(&[(10, 12), (5, 6)])
        );
    }

    #[rstest]
    fn test_grouped_query(subject: IntervalSet) {
        let groups = GroupedIntervals::from_pairs(vec![
            ("tx1".to_string(), set(&[(1, 1), (4, 4)])),
            ("tx2".to_string(), set(&[(20, 30)])),
            ("tx3".to_string(), set(&[(7, 7), (8, 8)])),
        ])
        .unwrap();
        let hits = find_overlaps_grouped(&groups, &subject, &OverlapOptions::default()).unwrap();
        assert_eq!(hits.to_pairs(), vec![(0, 0), (0, 1), (2, 2), (2, 3)]);
        assert_eq!(hits.query_len(), 3);
        assert_eq!(hits.count_per_query(), vec![2, 0, 2]);
    }
}
