use std::cmp::Ordering;

use num_traits::{PrimInt, Unsigned};

///
/// An index entry: a closed range `[start, end]` carrying a payload.
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Entry<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub start: I,
    pub end: I,
    pub val: T,
}

impl<I, T> Entry<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Check if the entry shares at least one position with `[start, end]`
    #[inline]
    pub fn overlap(&self, start: I, end: I) -> bool {
        self.start <= end && self.end >= start
    }
}

impl<I, T> Ord for Entry<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn cmp(&self, other: &Entry<I, T>) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl<I, T> PartialOrd for Entry<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

///
/// An interval index answering "which entries share a position with
/// `[start, end]`", both ends inclusive.
///
pub trait Overlapper<I, T>: Send + Sync
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(entries: Vec<Entry<I, T>>) -> Self
    where
        Self: Sized;

    fn find(&self, start: I, end: I) -> Vec<Entry<I, T>>;

    fn find_iter<'a>(&'a self, start: I, end: I) -> Box<dyn Iterator<Item = &'a Entry<I, T>> + 'a>;
}
