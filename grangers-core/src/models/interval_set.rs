use std::ops::Index;

use crate::errors::{Result, ValidationError};
use crate::models::Interval;

///
/// IntervalSet struct, an ordered collection of intervals over a single
/// coordinate space.
///
/// Order is meaningful (results are reported by row index) and neither
/// sortedness nor disjointness is required on construction.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl From<Vec<Interval>> for IntervalSet {
    fn from(intervals: Vec<Interval>) -> Self {
        IntervalSet { intervals }
    }
}

impl FromIterator<Interval> for IntervalSet {
    fn from_iter<T: IntoIterator<Item = Interval>>(iter: T) -> Self {
        IntervalSet {
            intervals: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<&[(u32, u32)]> for IntervalSet {
    type Error = ValidationError;

    fn try_from(value: &[(u32, u32)]) -> Result<Self> {
        IntervalSet::from_pairs(value)
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl IntoIterator for IntervalSet {
    type Item = Interval;
    type IntoIter = std::vec::IntoIter<Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.into_iter()
    }
}

impl Index<usize> for IntervalSet {
    type Output = Interval;

    fn index(&self, index: usize) -> &Self::Output {
        &self.intervals[index]
    }
}

impl IntervalSet {
    pub fn new(intervals: Vec<Interval>) -> Self {
        IntervalSet { intervals }
    }

    pub fn empty() -> Self {
        IntervalSet::default()
    }

    ///
    /// Create a new [IntervalSet] from `(start, end)` pairs.
    ///
    /// The first malformed pair is reported with its row index.
    ///
    pub fn from_pairs(pairs: &[(u32, u32)]) -> Result<Self> {
        let intervals = pairs
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| Interval::new(start, end).map_err(|e| e.at_index(i)))
            .collect::<Result<Vec<_>>>()?;
        Ok(IntervalSet { intervals })
    }

    /// [take](Self::take) for indices known to be in bounds.
    pub(crate) fn take_unchecked(&self, indices: &[usize]) -> Self {
        IntervalSet {
            intervals: indices.iter().map(|&i| self.intervals[i]).collect(),
        }
    }

    ///
    /// Create a new [IntervalSet] from `(start, width)` pairs.
    ///
    pub fn from_start_width(pairs: &[(u32, u32)]) -> Result<Self> {
        let intervals = pairs
            .iter()
            .enumerate()
            .map(|(i, &(start, width))| {
                Interval::from_width(start, width).map_err(|e| e.at_index(i))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(IntervalSet { intervals })
    }

    ///
    /// Create a new [IntervalSet] from parallel start and end vectors.
    ///
    pub fn from_starts_ends(starts: &[u32], ends: &[u32]) -> Result<Self> {
        if starts.len() != ends.len() {
            return Err(ValidationError::LengthMismatch {
                field: "ends".to_string(),
                expected: starts.len(),
                found: ends.len(),
            });
        }
        let pairs: Vec<(u32, u32)> = starts.iter().copied().zip(ends.iter().copied()).collect();
        IntervalSet::from_pairs(&pairs)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Interval> {
        self.intervals.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn starts(&self) -> Vec<u32> {
        self.intervals.iter().map(|iv| iv.start()).collect()
    }

    pub fn ends(&self) -> Vec<u32> {
        self.intervals.iter().map(|iv| iv.end()).collect()
    }

    pub fn widths(&self) -> Vec<u32> {
        self.intervals.iter().map(|iv| iv.width()).collect()
    }

    ///
    /// Sum of all widths; overlapping positions are counted once per interval.
    ///
    pub fn total_width(&self) -> u64 {
        self.intervals.iter().map(|iv| iv.width() as u64).sum()
    }

    /// Largest end coordinate, `None` for an empty set
    pub fn max_end(&self) -> Option<u32> {
        self.intervals.iter().map(|iv| iv.end()).max()
    }

    ///
    /// Select rows by index, in the given order. Indices may repeat.
    ///
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        let len = self.intervals.len();
        let intervals = indices
            .iter()
            .map(|&i| {
                self.intervals
                    .get(i)
                    .copied()
                    .ok_or(ValidationError::IndexOutOfBounds { index: i, len })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(IntervalSet { intervals })
    }

    ///
    /// Row order that sorts the set by start, then end. Stable, so ties keep
    /// their input order.
    ///
    pub fn order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.intervals.len()).collect();
        order.sort_by_key(|&i| self.intervals[i]);
        order
    }

    /// A sorted copy; `self` is left untouched.
    pub fn sorted(&self) -> Self {
        let mut intervals = self.intervals.clone();
        intervals.sort();
        IntervalSet { intervals }
    }

    pub fn is_sorted(&self) -> bool {
        self.intervals.windows(2).all(|w| w[0] <= w[1])
    }

    /// Rows of `self` followed by rows of `other`, without merging.
    pub fn concat(&self, other: &IntervalSet) -> Self {
        let mut intervals = Vec::with_capacity(self.len() + other.len());
        intervals.extend_from_slice(&self.intervals);
        intervals.extend_from_slice(&other.intervals);
        IntervalSet { intervals }
    }
}
