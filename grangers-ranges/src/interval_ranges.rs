//! Interval set algebra for plain interval sets.
//!
//! IRanges-style operations: reduce, disjoin, gaps, set operations and the
//! intra-range transformations. All operations use 1-based closed
//! coordinates and return new sets; inputs are never modified.

use grangers_core::errors::{Result, ValidationError};
use grangers_core::models::{Interval, IntervalSet};

/// Which end of an interval stays put in [IntervalRanges::resize].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fix {
    #[default]
    Start,
    End,
    Center,
}

///
/// Build an interval from wide intermediate coordinates, reporting the row
/// on failure.
///
pub(crate) fn checked_interval(index: usize, start: i64, end: i64) -> Result<Interval> {
    if start < 1 || end > u32::MAX as i64 || start > end {
        return Err(ValidationError::InvalidInterval {
            index: Some(index),
            start,
            end,
            reason: "result leaves the coordinate space 1..=u32::MAX",
        });
    }
    Ok(Interval::new_unchecked(start as u32, end as u32))
}

/// Interval algebra on an [IntervalSet].
///
/// Modeled after R's IRanges package.
pub trait IntervalRanges {
    /// Merge overlapping and adjacent intervals.
    ///
    /// Sorts by (start, end), then sweeps, extending the current interval
    /// while `next.start <= current.end + 1`. The result is sorted, pairwise
    /// non-overlapping and non-adjacent, and independent of input order.
    fn reduce(&self) -> IntervalSet;

    /// Split into the coarsest non-overlapping pieces such that every
    /// position is covered by exactly the same input intervals throughout
    /// each piece.
    ///
    /// # Example
    /// ```text
    /// input:   [1, 5], [3, 8]
    /// disjoin: [1, 2], [3, 5], [6, 8]
    /// ```
    fn disjoin(&self) -> IntervalSet;

    /// Single interval spanning the smallest start to the largest end.
    fn range(&self) -> IntervalSet;

    /// Stretches of `[start, end]` covered by no interval.
    fn gaps(&self, start: u32, end: u32) -> Result<IntervalSet>;

    /// Positions covered by either set, reduced.
    fn union(&self, other: &IntervalSet) -> IntervalSet;

    /// Positions covered by both sets, reduced.
    fn intersect(&self, other: &IntervalSet) -> IntervalSet;

    /// Positions covered by `self` but not by `other`, reduced.
    ///
    /// # Example
    /// ```text
    /// A: [100, 200]
    /// B: [120, 140], [160, 180]
    /// setdiff(A, B): [100, 119], [141, 159], [181, 200]
    /// ```
    fn setdiff(&self, other: &IntervalSet) -> IntervalSet;

    /// Intersection by index position (1st with 1st, 2nd with 2nd, ...).
    /// Pairs without overlap are dropped. Both sets must have equal length.
    fn pintersect(&self, other: &IntervalSet) -> Result<IntervalSet>;

    /// Move every interval by `offset` positions.
    fn shift(&self, offset: i64) -> Result<IntervalSet>;

    /// Regions of `width` positions next to each interval: before the start
    /// when `at_start`, after the end otherwise. With `both`, the flank
    /// extends `width` positions to either side of that end.
    /// Flanks are clamped at position 1.
    fn flank(&self, width: u32, at_start: bool, both: bool) -> Result<IntervalSet>;

    /// `[start - upstream, start + downstream - 1]` for every interval,
    /// clamped at position 1.
    fn promoters(&self, upstream: u32, downstream: u32) -> Result<IntervalSet>;

    /// Set every width to `width`, anchoring the side given by `fix`.
    fn resize(&self, width: u32, fix: Fix) -> Result<IntervalSet>;
}

impl IntervalRanges for IntervalSet {
    fn reduce(&self) -> IntervalSet {
        if self.is_empty() {
            return IntervalSet::empty();
        }

        let sorted = self.sorted();
        let intervals = sorted.as_slice();

        let mut merged: Vec<Interval> = Vec::new();
        let mut current = intervals[0];

        for iv in &intervals[1..] {
            if iv.start() as u64 <= current.end() as u64 + 1 {
                // overlapping or adjacent -- extend
                current = Interval::new_unchecked(current.start(), current.end().max(iv.end()));
            } else {
                merged.push(current);
                current = *iv;
            }
        }
        merged.push(current);

        IntervalSet::new(merged)
    }

    fn disjoin(&self) -> IntervalSet {
        // +1 at start, -1 just past end; u64 so that end + 1 cannot overflow
        let mut events: Vec<(u64, i64)> = Vec::with_capacity(self.len() * 2);
        for iv in self.iter() {
            events.push((iv.start() as u64, 1));
            events.push((iv.end() as u64 + 1, -1));
        }
        events.sort_unstable();

        let mut pieces: Vec<Interval> = Vec::new();
        let mut depth: i64 = 0;
        let mut i = 0;
        while i < events.len() {
            let pos = events[i].0;
            while i < events.len() && events[i].0 == pos {
                depth += events[i].1;
                i += 1;
            }
            if depth > 0 && i < events.len() {
                let next = events[i].0;
                pieces.push(Interval::new_unchecked(pos as u32, (next - 1) as u32));
            }
        }

        IntervalSet::new(pieces)
    }

    fn range(&self) -> IntervalSet {
        let start = self.iter().map(|iv| iv.start()).min();
        let end = self.max_end();
        match (start, end) {
            (Some(start), Some(end)) => IntervalSet::new(vec![Interval::new_unchecked(start, end)]),
            _ => IntervalSet::empty(),
        }
    }

    fn gaps(&self, start: u32, end: u32) -> Result<IntervalSet> {
        let window = Interval::new(start, end)?;
        let mut out: Vec<Interval> = Vec::new();
        let mut pos = window.start() as u64;

        for iv in self.reduce().iter() {
            if iv.end() < window.start() {
                continue;
            }
            if iv.start() > window.end() {
                break;
            }
            if (iv.start() as u64) > pos {
                out.push(Interval::new_unchecked(pos as u32, iv.start() - 1));
            }
            pos = pos.max(iv.end() as u64 + 1);
        }
        if pos <= window.end() as u64 {
            out.push(Interval::new_unchecked(pos as u32, window.end()));
        }

        Ok(IntervalSet::new(out))
    }

    fn union(&self, other: &IntervalSet) -> IntervalSet {
        self.concat(other).reduce()
    }

    fn intersect(&self, other: &IntervalSet) -> IntervalSet {
        let a = self.reduce();
        let b = other.reduce();
        let (a, b) = (a.as_slice(), b.as_slice());

        let mut out: Vec<Interval> = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            let start = a[i].start().max(b[j].start());
            let end = a[i].end().min(b[j].end());
            if start <= end {
                out.push(Interval::new_unchecked(start, end));
            }
            if a[i].end() < b[j].end() {
                i += 1;
            } else {
                j += 1;
            }
        }

        IntervalSet::new(out)
    }

    fn setdiff(&self, other: &IntervalSet) -> IntervalSet {
        let a = self.reduce();
        let b = other.reduce();
        let b = b.as_slice();

        let mut result: Vec<Interval> = Vec::new();
        let mut b_idx = 0;

        for region in a.iter() {
            // advance b cursor past intervals that end before this region starts
            while b_idx < b.len() && b[b_idx].end() < region.start() {
                b_idx += 1;
            }

            let mut pos = region.start() as u64;
            let mut j = b_idx;

            while j < b.len() && b[j].start() <= region.end() && pos <= region.end() as u64 {
                if b[j].start() as u64 > pos {
                    result.push(Interval::new_unchecked(pos as u32, b[j].start() - 1));
                }
                pos = pos.max(b[j].end() as u64 + 1);
                j += 1;
            }

            if pos <= region.end() as u64 {
                result.push(Interval::new_unchecked(pos as u32, region.end()));
            }
        }

        IntervalSet::new(result)
    }

    fn pintersect(&self, other: &IntervalSet) -> Result<IntervalSet> {
        if self.len() != other.len() {
            return Err(ValidationError::LengthMismatch {
                field: "other".to_string(),
                expected: self.len(),
                found: other.len(),
            });
        }
        let intervals: Vec<Interval> = self
            .iter()
            .zip(other.iter())
            .filter_map(|(a, b)| {
                let start = a.start().max(b.start());
                let end = a.end().min(b.end());
                (start <= end).then(|| Interval::new_unchecked(start, end))
            })
            .collect();
        Ok(IntervalSet::new(intervals))
    }

    fn shift(&self, offset: i64) -> Result<IntervalSet> {
        self.iter()
            .enumerate()
            .map(|(i, iv)| checked_interval(i, iv.start() as i64 + offset, iv.end() as i64 + offset))
            .collect::<Result<Vec<_>>>()
            .map(IntervalSet::new)
    }

    fn flank(&self, width: u32, at_start: bool, both: bool) -> Result<IntervalSet> {
        if width == 0 {
            return Err(ValidationError::InvalidArgument(
                "flank width must be positive".to_string(),
            ));
        }
        let w = width as i64;
        self.iter()
            .enumerate()
            .map(|(i, iv)| {
                let (start, end) = (iv.start() as i64, iv.end() as i64);
                let (lo, hi) = match (at_start, both) {
                    (true, false) => (start - w, start - 1),
                    (true, true) => (start - w, start + w - 1),
                    (false, false) => (end + 1, end + w),
                    (false, true) => (end - w + 1, end + w),
                };
                checked_interval(i, lo.max(1), hi)
            })
            .collect::<Result<Vec<_>>>()
            .map(IntervalSet::new)
    }

    fn promoters(&self, upstream: u32, downstream: u32) -> Result<IntervalSet> {
        self.iter()
            .enumerate()
            .map(|(i, iv)| {
                let start = iv.start() as i64;
                checked_interval(
                    i,
                    (start - upstream as i64).max(1),
                    start + downstream as i64 - 1,
                )
            })
            .collect::<Result<Vec<_>>>()
            .map(IntervalSet::new)
    }

    fn resize(&self, width: u32, fix: Fix) -> Result<IntervalSet> {
        if width == 0 {
            return Err(ValidationError::InvalidArgument(
                "resize width must be positive".to_string(),
            ));
        }
        let w = width as i64;
        self.iter()
            .enumerate()
            .map(|(i, iv)| {
                let (start, end) = (iv.start() as i64, iv.end() as i64);
                let lo = match fix {
                    Fix::Start => start,
                    Fix::End => end - w + 1,
                    Fix::Center => start + (iv.width() as i64 - w).div_euclid(2),
                };
                checked_interval(i, lo, lo + w - 1)
            })
            .collect::<Result<Vec<_>>>()
            .map(IntervalSet::new)
    }
}
