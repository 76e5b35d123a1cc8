use std::mem::swap;

use num_traits::{PrimInt, Unsigned};

use crate::traits::{Entry, Overlapper};

/// An Augmented Interval List for overlap queries over closed ranges.
///
/// From the following article: <https://academic.oup.com/bioinformatics/article/35/23/4907/5509521>
///
/// Entries are sorted by start and split into sublists: entries that contain
/// many of their successors are moved to a later sublist, so every sublist
/// can be scanned backwards from the query end and abandoned as soon as the
/// running maximum end falls before the query start. This keeps queries fast
/// on high-coverage data such as dense annotations.
///
/// # Examples
///
/// ```
/// use grangers_overlaprs::{AIList, Entry, Overlapper};
///
/// let genes = vec![
///     Entry { start: 1000u32, end: 2000, val: "GENE1" },
///     Entry { start: 1500, end: 2500, val: "GENE2" },
///     Entry { start: 5000, end: 6000, val: "GENE3" },
/// ];
///
/// let ailist = AIList::build(genes);
///
/// let overlaps = ailist.find(1800, 2200);
/// assert_eq!(overlaps.len(), 2);
///
/// // both ends are inclusive
/// assert_eq!(ailist.find(2500, 2500).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct AIList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    starts: Vec<I>,
    ends: Vec<I>,
    max_ends: Vec<I>,
    header_list: Vec<usize>,
    stored: Vec<Entry<I, T>>,
}

/// Scratch buffers reused across [`AIList::decompose`] rounds.
#[derive(Debug, Default)]
struct DecomposeResult<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    starts: Vec<I>,
    ends: Vec<I>,
    /// running maximum of `ends`
    max_ends: Vec<I>,
    stored: Vec<Entry<I, T>>,
    /// entries deferred to the next sublist
    l2: Vec<Entry<I, T>>,
}

impl<I, T> DecomposeResult<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn clear(&mut self) {
        self.starts.clear();
        self.ends.clear();
        self.max_ends.clear();
        self.stored.clear();
        self.l2.clear();
    }

    fn with_capacity(cap: usize) -> Self {
        Self {
            starts: Vec::with_capacity(cap),
            ends: Vec::with_capacity(cap),
            max_ends: Vec::with_capacity(cap),
            stored: Vec::with_capacity(cap),
            l2: Vec::with_capacity(cap),
        }
    }
}

impl<I, T> Overlapper<I, T> for AIList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(entries: Vec<Entry<I, T>>) -> Self
    where
        Self: Sized,
    {
        let mut entries = entries;
        entries.sort_by_key(|e| e.start);

        let mut starts = Vec::with_capacity(entries.len());
        let mut ends = Vec::with_capacity(entries.len());
        let mut max_ends = Vec::with_capacity(entries.len());
        let mut stored = Vec::with_capacity(entries.len());

        // one allocation for the scratch space, drained every round
        let mut results = DecomposeResult::with_capacity(entries.len());

        let mut header_list = vec![0];

        loop {
            Self::decompose(&entries, 10, &mut results);

            starts.append(&mut results.starts);
            ends.append(&mut results.ends);
            max_ends.append(&mut results.max_ends);
            stored.append(&mut results.stored);
            swap(&mut entries, &mut results.l2);

            if entries.is_empty() {
                break;
            } else {
                header_list.push(starts.len());
            }
        }

        AIList {
            starts,
            ends,
            max_ends,
            header_list,
            stored,
        }
    }

    fn find(&self, start: I, end: I) -> Vec<Entry<I, T>> {
        self.find_iter(start, end).cloned().collect()
    }

    fn find_iter<'a>(&'a self, start: I, end: I) -> Box<dyn Iterator<Item = &'a Entry<I, T>> + 'a> {
        Box::new(IterFind {
            inner: self,
            header_list_idx: 0,
            list_idx: None,
            start,
            end,
        })
    }
}

impl<I, T> AIList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn decompose(
        entries: &[Entry<I, T>],
        minimum_coverage_length: usize,
        scratch: &mut DecomposeResult<I, T>,
    ) {
        scratch.clear();

        for (index, entry) in entries.iter().enumerate() {
            let mut count = 0;
            for i in 1..(minimum_coverage_length * 2) {
                match entries.get(index + i) {
                    Some(next) => {
                        if entry.end > next.end {
                            count += 1;
                        }
                    }
                    None => break,
                }
            }
            if count >= minimum_coverage_length {
                scratch.l2.push(entry.clone());
            } else {
                scratch.starts.push(entry.start);
                scratch.ends.push(entry.end);
                scratch.stored.push(entry.clone());
            }
        }

        let mut max: I = I::zero();
        for end in scratch.ends.iter() {
            max = max.max(*end);
            scratch.max_ends.push(max);
        }
    }

    /// Bounds of sublist `idx` within the flat arrays.
    fn sublist(&self, idx: usize) -> std::ops::Range<usize> {
        if idx == self.header_list.len() - 1 {
            self.header_list[idx]..self.starts.len()
        } else {
            self.header_list[idx]..self.header_list[idx + 1]
        }
    }

    /// Number of sublists the entries were decomposed into.
    pub fn n_sublists(&self) -> usize {
        self.header_list.len()
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

/// Lazy overlap iterator over an [`AIList`], created by
/// [`find_iter`](Overlapper::find_iter).
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync + 'a,
{
    inner: &'a AIList<I, T>,
    header_list_idx: usize,
    list_idx: Option<usize>,
    start: I,
    end: I,
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync + 'a,
{
    type Item = &'a Entry<I, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.header_list_idx < self.inner.header_list.len() {
            let range = self.inner.sublist(self.header_list_idx);
            let starts = &self.inner.starts[range.clone()];
            let ends = &self.inner.ends[range.clone()];
            let max_ends = &self.inner.max_ends[range.clone()];
            let stored = &self.inner.stored[range];

            let end = self.end;
            let mut i = self
                .list_idx
                .unwrap_or_else(|| starts.partition_point(|&x| x <= end));

            while i > 0 {
                i -= 1;
                if ends[i] < self.start {
                    // nothing earlier in this sublist can reach the query
                    if max_ends[i] < self.start {
                        break;
                    }
                } else {
                    self.list_idx = Some(i);
                    return Some(&stored[i]);
                }
            }
            self.list_idx = None;
            self.header_list_idx += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn entry<T>(start: u32, end: u32, val: T) -> Entry<u32, T>
    where
        T: Eq + Clone + Send + Sync,
    {
        Entry { start, end, val }
    }

    #[fixture]
    fn entries() -> Vec<Entry<u32, &'static str>> {
        vec![
            entry(1, 5, "a"),
            entry(3, 7, "b"),
            entry(6, 10, "c"),
            entry(8, 12, "d"),
        ]
    }

    fn vals(found: Vec<Entry<u32, &'static str>>) -> Vec<&'static str> {
        let mut vals: Vec<&str> = found.iter().map(|e| e.val).collect();
        vals.sort();
        vals
    }

    #[rstest]
    fn test_build_and_len(entries: Vec<Entry<u32, &'static str>>) {
        let ailist = AIList::build(entries.clone());
        assert_eq!(ailist.len(), entries.len());
        assert!(!ailist.is_empty());
    }

    #[rstest]
    #[case(2, 4, vec!["a", "b"])]
    #[case(9, 11, vec!["c", "d"])]
    #[case(13, 15, vec![])]
    // closed ends: touching a boundary position counts
    #[case(5, 5, vec!["a", "b"])]
    #[case(12, 20, vec!["d"])]
    #[case(1, 1, vec!["a"])]
    fn test_find(
        entries: Vec<Entry<u32, &'static str>>,
        #[case] start: u32,
        #[case] end: u32,
        #[case] expected: Vec<&'static str>,
    ) {
        let ailist = AIList::build(entries);
        assert_eq!(vals(ailist.find(start, end)), expected);
    }

    #[rstest]
    fn test_empty_ailist() {
        let ailist: AIList<u32, &str> = AIList::build(vec![]);
        assert_eq!(ailist.len(), 0);
        assert!(ailist.find(1, 2).is_empty());
        assert_eq!(ailist.find_iter(1, 2).count(), 0);
    }

    #[rstest]
    fn test_find_iter_matches_brute_force() {
        let mut entries: Vec<Entry<u32, usize>> = Vec::new();
        // long entries spanning many short ones force several sublists
        for (i, (s, e)) in [
            (1, 30),
            (1, 10),
            (1, 10),
            (5, 15),
            (5, 15),
            (10, 20),
            (10, 20),
            (15, 25),
            (15, 25),
            (21, 22),
            (22, 23),
            (20, 30),
            (20, 30),
            (25, 100),
            (26, 27),
            (27, 28),
            (29, 30),
            (30, 31),
            (32, 33),
            (50, 51),
            (51, 52),
            (52, 53),
            (53, 54),
            (55, 56),
            (60, 61),
            (70, 71),
        ]
        .into_iter()
        .enumerate()
        {
            entries.push(entry(s, e, i));
        }
        let ailist = AIList::build(entries.clone());
        assert_eq!(ailist.n_sublists(), 2);

        for (qs, qe) in [(6, 8), (30, 35), (101, 150), (1, 1), (56, 60), (1, 200)] {
            let mut found: Vec<usize> = ailist.find_iter(qs, qe).map(|e| e.val).collect();
            found.sort();
            let expected: Vec<usize> = entries
                .iter()
                .filter(|e| e.overlap(qs, qe))
                .map(|e| e.val)
                .collect();
            assert_eq!(found, expected, "query [{qs}, {qe}]");
        }
    }
}
