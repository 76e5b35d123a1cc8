use crate::errors::{Result, ValidationError};

///
/// Run-length encoded vector.
///
/// Stores a long sequence as `(value, run length)` pairs. The encoding is
/// always maximal: every run length is positive and no two neighbouring
/// runs carry equal values, so two `Rle`s are equal exactly when their dense
/// expansions are equal.
///
/// Positions are 1-based, matching the interval convention.
///
/// # Examples
///
/// ```
/// use grangers_core::models::Rle;
///
/// let rle = Rle::from_dense(&[1u32, 2, 2, 1, 1]);
/// assert_eq!(rle.values(), &[1, 2, 1]);
/// assert_eq!(rle.lengths(), &[1, 2, 2]);
/// assert_eq!(rle.expand(), vec![1, 2, 2, 1, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rle<V> {
    values: Vec<V>,
    lengths: Vec<usize>,
    /// cumulative run ends, 1-based, for random access
    #[cfg_attr(feature = "serde", serde(skip))]
    ends: Vec<usize>,
}

impl<V> Rle<V>
where
    V: PartialEq + Clone,
{
    /// An Rle of logical length zero.
    pub fn new() -> Self {
        Rle {
            values: Vec::new(),
            lengths: Vec::new(),
            ends: Vec::new(),
        }
    }

    ///
    /// Compress a dense sequence.
    ///
    pub fn from_dense(dense: &[V]) -> Self {
        let mut values: Vec<V> = Vec::new();
        let mut lengths: Vec<usize> = Vec::new();

        for v in dense {
            match values.last() {
                Some(last) if last == v => {
                    // non-empty by construction
                    if let Some(len) = lengths.last_mut() {
                        *len += 1;
                    }
                }
                _ => {
                    values.push(v.clone());
                    lengths.push(1);
                }
            }
        }

        Self::from_parts(values, lengths)
    }

    ///
    /// Build from explicit runs.
    ///
    /// Neighbouring runs with equal values are merged. Fails when the two
    /// vectors differ in length or a run length is zero.
    ///
    pub fn from_runs(values: Vec<V>, lengths: Vec<usize>) -> Result<Self> {
        if values.len() != lengths.len() {
            return Err(ValidationError::LengthMismatch {
                field: "lengths".to_string(),
                expected: values.len(),
                found: lengths.len(),
            });
        }
        if let Some(i) = lengths.iter().position(|&l| l == 0) {
            return Err(ValidationError::InvalidRuns(format!(
                "run {i} has length zero"
            )));
        }

        Ok(Self::merge_runs(values, lengths))
    }

    /// Merge neighbouring runs with equal values; lengths must be positive.
    fn merge_runs(values: Vec<V>, lengths: Vec<usize>) -> Self {
        let mut merged_values: Vec<V> = Vec::with_capacity(values.len());
        let mut merged_lengths: Vec<usize> = Vec::with_capacity(lengths.len());
        for (v, l) in values.into_iter().zip(lengths) {
            match merged_values.last() {
                Some(last) if *last == v => {
                    if let Some(len) = merged_lengths.last_mut() {
                        *len += l;
                    }
                }
                _ => {
                    merged_values.push(v);
                    merged_lengths.push(l);
                }
            }
        }
        Self::from_parts(merged_values, merged_lengths)
    }

    /// Caller guarantees maximal compression.
    pub(crate) fn from_parts(values: Vec<V>, lengths: Vec<usize>) -> Self {
        let mut ends = Vec::with_capacity(lengths.len());
        let mut total = 0;
        for l in &lengths {
            total += l;
            ends.push(total);
        }
        Rle {
            values,
            lengths,
            ends,
        }
    }

    ///
    /// Append `length` copies of `value`, extending the last run when the
    /// value repeats. Zero-length runs are ignored.
    ///
    pub fn push_run(&mut self, value: V, length: usize) {
        if length == 0 {
            return;
        }
        let total = self.len() + length;
        match self.values.last() {
            Some(last) if *last == value => {
                if let (Some(l), Some(e)) = (self.lengths.last_mut(), self.ends.last_mut()) {
                    *l += length;
                    *e = total;
                }
            }
            _ => {
                self.values.push(value);
                self.lengths.push(length);
                self.ends.push(total);
            }
        }
    }

    ///
    /// Expand back into the dense sequence.
    ///
    pub fn expand(&self) -> Vec<V> {
        let mut dense = Vec::with_capacity(self.len());
        for (v, l) in self.runs() {
            dense.extend(std::iter::repeat_n(v.clone(), l));
        }
        dense
    }

    /// Logical (expanded) length.
    pub fn len(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn n_runs(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Iterate `(value, run length)` pairs in positional order.
    pub fn runs(&self) -> impl Iterator<Item = (&V, usize)> + '_ {
        self.values.iter().zip(self.lengths.iter().copied())
    }

    /// 1-based first position of every run
    pub fn run_starts(&self) -> Vec<usize> {
        self.ends
            .iter()
            .zip(self.lengths.iter())
            .map(|(e, l)| e - l + 1)
            .collect()
    }

    /// 1-based last position of every run
    pub fn run_ends(&self) -> &[usize] {
        &self.ends
    }

    ///
    /// Value at a 1-based position, `None` outside `1..=len()`.
    ///
    pub fn get(&self, position: usize) -> Option<&V> {
        if position == 0 || position > self.len() {
            return None;
        }
        let run = self.ends.partition_point(|&e| e < position);
        self.values.get(run)
    }

    ///
    /// Sub-vector covering the 1-based closed window `[start, end]`.
    ///
    pub fn window(&self, start: usize, end: usize) -> Result<Self> {
        if start == 0 || start > end || end > self.len() {
            return Err(ValidationError::InvalidInterval {
                index: None,
                start: start as i64,
                end: end as i64,
                reason: "window outside the vector",
            });
        }

        let first = self.ends.partition_point(|&e| e < start);
        let last = self.ends.partition_point(|&e| e < end);

        let values = self.values[first..=last].to_vec();
        let mut lengths = self.lengths[first..=last].to_vec();
        let run_start = self.ends[first] - self.lengths[first] + 1;
        lengths[0] -= start - run_start;
        let n = lengths.len();
        lengths[n - 1] -= self.ends[last] - end;

        Ok(Self::from_parts(values, lengths))
    }

    /// Apply `f` to every run value, re-compressing when `f` makes neighbours equal.
    pub fn map<U, F>(&self, f: F) -> Rle<U>
    where
        U: PartialEq + Clone,
        F: Fn(&V) -> U,
    {
        let values = self.values.iter().map(f).collect();
        Rle::merge_runs(values, self.lengths.clone())
    }
}

impl<V> Default for Rle<V>
where
    V: PartialEq + Clone,
{
    fn default() -> Self {
        Rle::new()
    }
}

impl Rle<u32> {
    /// Sum over all positions.
    pub fn sum(&self) -> u64 {
        self.runs().map(|(v, l)| *v as u64 * l as u64).sum()
    }

    pub fn max(&self) -> Option<u32> {
        self.values.iter().copied().max()
    }
}

impl Rle<i64> {
    /// Sum over all positions.
    pub fn sum(&self) -> i64 {
        self.runs().map(|(v, l)| *v * l as i64).sum()
    }
}

impl<V> From<Vec<V>> for Rle<V>
where
    V: PartialEq + Clone,
{
    fn from(value: Vec<V>) -> Self {
        Rle::from_dense(&value)
    }
}

impl<V> FromIterator<V> for Rle<V>
where
    V: PartialEq + Clone,
{
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        let dense: Vec<V> = iter.into_iter().collect();
        Rle::from_dense(&dense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(vec![])]
    #[case(vec![7, 7, 7, 7])]
    #[case(vec![1, 2, 3, 4, 5])]
    #[case(vec![0, 0, 1, 1, 1, 0, 2, 2])]
    fn test_expand_compress_round_trip(#[case] dense: Vec<u32>) {
        let rle = Rle::from_dense(&dense);
        assert_eq!(rle.expand(), dense);
        assert_eq!(rle.len(), dense.len());
    }

    #[rstest]
    fn test_all_equal_is_one_run() {
        let rle = Rle::from_dense(&["chr1"; 5]);
        assert_eq!(rle.n_runs(), 1);
        assert_eq!(rle.lengths(), &[5]);
    }

    #[rstest]
    fn test_from_runs_merges_neighbours() {
        let rle = Rle::from_runs(vec![1, 1, 2, 2, 1], vec![2, 3, 1, 1, 4]).unwrap();
        assert_eq!(rle.values(), &[1, 2, 1]);
        assert_eq!(rle.lengths(), &[5, 2, 4]);
        assert_eq!(rle.len(), 11);
    }

    #[rstest]
    fn test_from_runs_validation() {
        assert!(matches!(
            Rle::from_runs(vec![1, 2], vec![3]),
            Err(ValidationError::LengthMismatch { .. })
        ));
        assert!(matches!(
            Rle::from_runs(vec![1, 2], vec![3, 0]),
            Err(ValidationError::InvalidRuns(_))
        ));
    }

    #[rstest]
    fn test_random_access() {
        let rle = Rle::from_dense(&[1u32, 2, 2, 1, 1]);
        assert_eq!(rle.get(0), None);
        assert_eq!(rle.get(1), Some(&1));
        assert_eq!(rle.get(2), Some(&2));
        assert_eq!(rle.get(3), Some(&2));
        assert_eq!(rle.get(5), Some(&1));
        assert_eq!(rle.get(6), None);
        assert_eq!(rle.run_starts(), vec![1, 2, 4]);
        assert_eq!(rle.run_ends(), &[1, 3, 5]);
    }

    #[rstest]
    fn test_window() {
        let dense = vec![0u32, 0, 1, 1, 1, 2, 2, 0];
        let rle = Rle::from_dense(&dense);
        let w = rle.window(2, 7).unwrap();
        assert_eq!(w.expand(), dense[1..7].to_vec());

        let single = rle.window(4, 4).unwrap();
        assert_eq!(single.expand(), vec![1]);

        assert!(rle.window(0, 3).is_err());
        assert!(rle.window(3, 9).is_err());
    }

    #[rstest]
    fn test_push_run_merges() {
        let mut rle: Rle<u32> = Rle::default();
        rle.push_run(0, 2);
        rle.push_run(0, 1);
        rle.push_run(4, 0);
        rle.push_run(1, 2);
        assert_eq!(rle.values(), &[0, 1]);
        assert_eq!(rle.lengths(), &[3, 2]);
        assert_eq!(rle.run_ends(), &[3, 5]);
        assert_eq!(rle.get(4), Some(&1));
    }

    #[rstest]
    fn test_sum_and_map() {
        let rle = Rle::from_dense(&[1u32, 2, 2, 1, 1]);
        assert_eq!(rle.sum(), 7);
        assert_eq!(rle.max(), Some(2));

        let covered = rle.map(|v| *v > 0);
        assert_eq!(covered.n_runs(), 1);
        assert_eq!(covered.len(), 5);
    }
}
