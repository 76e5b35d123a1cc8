use num_traits::{PrimInt, Unsigned, identities::zero};

use crate::traits::{Entry, Overlapper};

/// A Binary Interval Search index over closed ranges.
///
/// From the journal article: <https://academic.oup.com/bioinformatics/article/29/1/1/273289>
///
/// Keeps the entries sorted by start together with separately sorted start
/// and end coordinates. Lookups binary-search for the first entry that could
/// still reach the query (start no earlier than `query.start - max_len`) and
/// scan forward; counting needs only two binary searches.
///
/// # Examples
///
/// ```
/// use grangers_overlaprs::{Bits, Entry, Overlapper};
///
/// let reads = vec![
///     Entry { start: 100u32, end: 150, val: "read1" },
///     Entry { start: 200, end: 250, val: "read2" },
///     Entry { start: 225, end: 275, val: "read3" },
/// ];
///
/// let bits = Bits::build(reads);
///
/// assert_eq!(bits.find(210, 240).len(), 2);
/// assert_eq!(bits.count(210, 240), 2);
/// assert_eq!(bits.count(150, 150), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    entries: Vec<Entry<I, T>>,
    /// sorted start positions
    starts: Vec<I>,
    /// sorted end positions
    ends: Vec<I>,
    /// largest `end - start` of any entry
    max_len: I,
}

impl<I, T> Overlapper<I, T> for Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(mut entries: Vec<Entry<I, T>>) -> Self
    where
        Self: Sized,
    {
        entries.sort();
        let (mut starts, mut ends): (Vec<_>, Vec<_>) =
            entries.iter().map(|x| (x.start, x.end)).unzip();
        starts.sort();
        ends.sort();
        let max_len = entries
            .iter()
            .map(|e| e.end.checked_sub(&e.start).unwrap_or_else(zero::<I>))
            .max()
            .unwrap_or_else(zero::<I>);
        Bits {
            entries,
            starts,
            ends,
            max_len,
        }
    }

    #[inline]
    fn find(&self, start: I, end: I) -> Vec<Entry<I, T>> {
        self.find_iter(start, end).cloned().collect()
    }

    fn find_iter<'a>(&'a self, start: I, end: I) -> Box<dyn Iterator<Item = &'a Entry<I, T>> + 'a> {
        let off = Self::lower_bound(
            start.checked_sub(&self.max_len).unwrap_or_else(zero::<I>),
            &self.entries,
        );
        Box::new(IterFind {
            inner: self,
            off,
            start,
            end,
        })
    }
}

impl<I, T> Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, sorted by start then end.
    pub fn entries(&self) -> &[Entry<I, T>] {
        &self.entries
    }

    /// Index of the first entry whose start is not below `start`.
    #[inline]
    fn lower_bound(start: I, entries: &[Entry<I, T>]) -> usize {
        entries.partition_point(|e| e.start < start)
    }

    /// Count entries overlapping `[start, end]` without visiting them: every
    /// entry is either entirely before the query, entirely after it, or
    /// overlapping.
    #[inline]
    pub fn count(&self, start: I, end: I) -> usize {
        let before = self.ends.partition_point(|&e| e < start);
        let not_after = self.starts.partition_point(|&s| s <= end);
        not_after - before.min(not_after)
    }
}

/// Lazy overlap iterator over a [`Bits`] index.
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync + 'a,
{
    inner: &'a Bits<I, T>,
    off: usize,
    start: I,
    end: I,
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync + 'a,
{
    type Item = &'a Entry<I, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.off < self.inner.entries.len() {
            let entry = &self.inner.entries[self.off];
            self.off += 1;
            if entry.overlap(self.start, self.end) {
                return Some(entry);
            } else if entry.start > self.end {
                break;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn bits() -> Bits<u32, usize> {
        let entries = (1u32..100)
            .step_by(5)
            .enumerate()
            .map(|(i, x)| Entry {
                start: x,
                end: x + 2,
                val: i,
            })
            .collect::<Vec<_>>();
        Bits::build(entries)
    }

    #[rstest]
    #[case(6, 11)]
    #[case(1, 1)]
    #[case(3, 6)]
    #[case(4, 5)]
    #[case(95, 200)]
    fn test_find_and_count_agree(bits: Bits<u32, usize>, #[case] start: u32, #[case] end: u32) {
        let expected: Vec<usize> = bits
            .entries()
            .iter()
            .filter(|e| e.overlap(start, end))
            .map(|e| e.val)
            .collect();
        let found: Vec<usize> = bits.find_iter(start, end).map(|e| e.val).collect();
        assert_eq!(found, expected);
        assert_eq!(bits.count(start, end), expected.len());
    }

    #[rstest]
    fn test_closed_boundaries(bits: Bits<u32, usize>) {
        // entries are [1,3], [6,8], ...
        assert_eq!(bits.count(3, 3), 1);
        assert_eq!(bits.count(4, 5), 0);
        assert_eq!(bits.count(3, 6), 2);
    }

    #[rstest]
    fn test_long_entry_found_from_far_start() {
        let bits = Bits::build(vec![
            Entry {
                start: 1u32,
                end: 1000,
                val: "long",
            },
            Entry {
                start: 500,
                end: 501,
                val: "short",
            },
        ]);
        let vals: Vec<&str> = bits.find(900, 950).iter().map(|e| e.val).collect();
        assert_eq!(vals, vec!["long"]);
    }

    #[rstest]
    fn test_empty() {
        let bits: Bits<u32, ()> = Bits::build(vec![]);
        assert!(bits.is_empty());
        assert_eq!(bits.find(1, 10).len(), 0);
        assert_eq!(bits.count(1, 10), 0);
    }
}
