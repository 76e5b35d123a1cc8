use grangers_core::errors::{Result, ValidationError};

/// How [`Hits::select`] picks one subject per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Select {
    /// lowest subject index
    #[default]
    First,
    /// highest subject index
    Last,
    /// any hit; currently the first one found
    Arbitrary,
}

///
/// Hits struct, the result of an overlap query: a list of
/// `(query index, subject index)` pairs together with the sizes of both sides.
///
/// Pairs are ordered by query index, then subject index, and every pair
/// occurs at most once.
///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hits {
    query_hits: Vec<usize>,
    subject_hits: Vec<usize>,
    query_len: usize,
    subject_len: usize,
}

impl Hits {
    /// Build from pairs that are already sorted and unique.
    pub(crate) fn from_sorted(pairs: Vec<(usize, usize)>, query_len: usize, subject_len: usize) -> Self {
        debug_assert!(pairs.windows(2).all(|w| w[0] < w[1]));
        let (query_hits, subject_hits) = pairs.into_iter().unzip();
        Hits {
            query_hits,
            subject_hits,
            query_len,
            subject_len,
        }
    }

    /// Build from in-bounds pairs in any order.
    pub(crate) fn from_unsorted(mut pairs: Vec<(usize, usize)>, query_len: usize, subject_len: usize) -> Self {
        pairs.sort_unstable();
        pairs.dedup();
        Hits::from_sorted(pairs, query_len, subject_len)
    }

    ///
    /// Build from arbitrary pairs; they are sorted and duplicates dropped.
    /// Every query index must be below `query_len` and every subject index
    /// below `subject_len`.
    ///
    pub fn from_pairs(pairs: Vec<(usize, usize)>, query_len: usize, subject_len: usize) -> Result<Self> {
        for &(q, s) in &pairs {
            if q >= query_len {
                return Err(ValidationError::IndexOutOfBounds { index: q, len: query_len });
            }
            if s >= subject_len {
                return Err(ValidationError::IndexOutOfBounds { index: s, len: subject_len });
            }
        }
        Ok(Hits::from_unsorted(pairs, query_len, subject_len))
    }

    pub fn len(&self) -> usize {
        self.query_hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.query_hits.is_empty()
    }

    pub fn query_hits(&self) -> &[usize] {
        &self.query_hits
    }

    pub fn subject_hits(&self) -> &[usize] {
        &self.subject_hits
    }

    /// Number of query elements, including those without any hit.
    pub fn query_len(&self) -> usize {
        self.query_len
    }

    pub fn subject_len(&self) -> usize {
        self.subject_len
    }

    /// Iterate `(query, subject)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.query_hits
            .iter()
            .copied()
            .zip(self.subject_hits.iter().copied())
    }

    pub fn to_pairs(&self) -> Vec<(usize, usize)> {
        self.iter().collect()
    }

    /// Number of hits for every query element.
    pub fn count_per_query(&self) -> Vec<usize> {
        let mut counts = vec![0; self.query_len];
        for &q in &self.query_hits {
            counts[q] += 1;
        }
        counts
    }

    /// Number of hits for every subject element.
    pub fn count_per_subject(&self) -> Vec<usize> {
        let mut counts = vec![0; self.subject_len];
        for &s in &self.subject_hits {
            counts[s] += 1;
        }
        counts
    }

    ///
    /// One subject per query element, `None` for queries without hits.
    ///
    pub fn select(&self, select: Select) -> Vec<Option<usize>> {
        let mut picked: Vec<Option<usize>> = vec![None; self.query_len];
        for (q, s) in self.iter() {
            match select {
                Select::First | Select::Arbitrary => {
                    picked[q].get_or_insert(s);
                }
                Select::Last => picked[q] = Some(s),
            }
        }
        picked
    }
}
