use fxhash::FxHashMap;
use rayon::prelude::*;

use crate::errors::{Result, ValidationError};
use crate::models::{AnnotatedIntervalSet, Interval, IntervalSet, MetaColumn, MetadataFrame, Strand};

/// Anything that can be stored as one group of a [GroupedIntervals].
pub trait GroupMember {
    /// Number of ranges in the group.
    fn n_ranges(&self) -> usize;
}

impl GroupMember for IntervalSet {
    fn n_ranges(&self) -> usize {
        self.len()
    }
}

impl GroupMember for AnnotatedIntervalSet {
    fn n_ranges(&self) -> usize {
        self.len()
    }
}

///
/// GroupedIntervals struct, a named, insertion-ordered collection of interval
/// sets (one per group key).
///
/// The optional `universe` (e.g. a genome build name) is advisory only and
/// never changes the result of an operation.
///
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedIntervals<S> {
    names: Vec<String>,
    groups: Vec<S>,
    lookup: FxHashMap<String, usize>,
    universe: Option<String>,
}

impl<S> Default for GroupedIntervals<S> {
    fn default() -> Self {
        GroupedIntervals {
            names: Vec::new(),
            groups: Vec::new(),
            lookup: FxHashMap::default(),
            universe: None,
        }
    }
}

impl<S> GroupedIntervals<S> {
    pub fn new() -> Self {
        GroupedIntervals::default()
    }

    ///
    /// Build from `(key, set)` pairs, rejecting duplicate keys.
    ///
    pub fn from_pairs(pairs: Vec<(String, S)>) -> Result<Self> {
        let mut grouped = GroupedIntervals::new();
        for (name, set) in pairs {
            grouped.insert(name, set)?;
        }
        Ok(grouped)
    }

    ///
    /// Build from positional groups; keys are `"1"`, `"2"`, ….
    ///
    pub fn from_unnamed(sets: Vec<S>) -> Self {
        let mut grouped = GroupedIntervals::new();
        for (i, set) in sets.into_iter().enumerate() {
            grouped.push_unique((i + 1).to_string(), set);
        }
        grouped
    }

    /// Append a group whose key the caller knows to be new.
    pub(crate) fn push_unique(&mut self, name: String, set: S) {
        self.lookup.insert(name.clone(), self.groups.len());
        self.names.push(name);
        self.groups.push(set);
    }

    pub fn with_universe(mut self, universe: impl Into<String>) -> Self {
        self.universe = Some(universe.into());
        self
    }

    pub fn universe(&self) -> Option<&str> {
        self.universe.as_deref()
    }

    ///
    /// Append a group. Keys must be unique.
    ///
    pub fn insert(&mut self, name: impl Into<String>, set: S) -> Result<()> {
        let name = name.into();
        if self.lookup.contains_key(&name) {
            return Err(ValidationError::DuplicateKey(name));
        }
        self.push_unique(name, set);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&S> {
        self.lookup.get(name).map(|&i| &self.groups[i])
    }

    pub fn get_index(&self, i: usize) -> Option<&S> {
        self.groups.get(i)
    }

    pub fn names(&self) -> Vec<&str> {
        self.names.iter().map(|n| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate `(key, set)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &S)> {
        self.names.iter().map(|n| n.as_str()).zip(self.groups.iter())
    }

    ///
    /// Apply `f` to every group; keys, order and universe are kept.
    ///
    pub fn map_groups<T, F>(&self, f: F) -> GroupedIntervals<T>
    where
        F: Fn(&S) -> T,
    {
        GroupedIntervals {
            names: self.names.clone(),
            groups: self.groups.iter().map(f).collect(),
            lookup: self.lookup.clone(),
            universe: self.universe.clone(),
        }
    }

    /// Fallible [map_groups](Self::map_groups); the first error aborts.
    pub fn try_map_groups<T, F>(&self, f: F) -> Result<GroupedIntervals<T>>
    where
        F: Fn(&S) -> Result<T>,
    {
        Ok(GroupedIntervals {
            names: self.names.clone(),
            groups: self.groups.iter().map(f).collect::<Result<Vec<T>>>()?,
            lookup: self.lookup.clone(),
            universe: self.universe.clone(),
        })
    }

    ///
    /// Parallel [map_groups](Self::map_groups). Groups never interact, so the
    /// result is identical to the sequential version.
    ///
    pub fn par_map_groups<T, F>(&self, f: F) -> GroupedIntervals<T>
    where
        S: Sync,
        T: Send,
        F: Fn(&S) -> T + Sync + Send,
    {
        log::debug!("mapping {} groups in parallel", self.groups.len());
        GroupedIntervals {
            names: self.names.clone(),
            groups: self.groups.par_iter().map(f).collect(),
            lookup: self.lookup.clone(),
            universe: self.universe.clone(),
        }
    }
}

impl<S> GroupedIntervals<S>
where
    S: GroupMember,
{
    /// Number of ranges in each group.
    pub fn element_lengths(&self) -> Vec<usize> {
        self.groups.iter().map(|g| g.n_ranges()).collect()
    }

    /// Group index of every row of the flattened collection.
    pub fn provenance(&self) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .flat_map(|(i, g)| std::iter::repeat_n(i, g.n_ranges()))
            .collect()
    }
}

impl GroupedIntervals<IntervalSet> {
    ///
    /// Concatenate all groups in key order.
    ///
    pub fn unlist(&self) -> IntervalSet {
        let intervals: Vec<Interval> = self
            .groups
            .iter()
            .flat_map(|g| g.iter().copied())
            .collect();
        IntervalSet::new(intervals)
    }

    /// [unlist](Self::unlist) plus the group index of every row.
    pub fn unlist_with_provenance(&self) -> (IntervalSet, Vec<usize>) {
        (self.unlist(), self.provenance())
    }
}

impl GroupedIntervals<AnnotatedIntervalSet> {
    ///
    /// Concatenate all groups in key order, keeping seqnames, strands and
    /// metadata aligned. Non-empty groups must share one metadata schema.
    /// With `with_provenance`, a `group` column holding the originating key
    /// is placed before the other metadata columns.
    ///
    pub fn unlist(&self, with_provenance: bool) -> Result<AnnotatedIntervalSet> {
        let mut intervals: Vec<Interval> = Vec::new();
        let mut seqnames: Vec<String> = Vec::new();
        let mut strands: Vec<Strand> = Vec::new();
        let mut origin: Vec<String> = Vec::new();
        let mut metadata: Option<MetadataFrame> = None;

        for (name, group) in self.iter() {
            if group.is_empty() {
                continue;
            }
            intervals.extend(group.ranges().iter().copied());
            seqnames.extend(group.seqnames().expand());
            strands.extend(group.strands().expand());
            origin.extend(std::iter::repeat_n(name.to_string(), group.len()));
            metadata = Some(match metadata {
                None => group.metadata().clone(),
                Some(frame) => frame.concat(group.metadata(), name)?,
            });
        }

        let n = intervals.len();
        let mut metadata = metadata.unwrap_or_else(|| MetadataFrame::empty(n));
        if with_provenance {
            metadata = metadata.with_leading_column("group", MetaColumn::Str(origin))?;
        }

        AnnotatedIntervalSet::new(IntervalSet::new(intervals), seqnames, strands, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetaValue;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn grouped() -> GroupedIntervals<IntervalSet> {
        GroupedIntervals::from_pairs(vec![
            (
                "tx1".to_string(),
                IntervalSet::from_pairs(&[(1, 5), (10, 12)]).unwrap(),
            ),
            ("tx2".to_string(), IntervalSet::empty()),
            (
                "tx3".to_string(),
                IntervalSet::from_pairs(&[(3, 4)]).unwrap(),
            ),
        ])
        .unwrap()
        .with_universe("hg38")
    }

    #[rstest]
    fn test_lookup_and_order(grouped: GroupedIntervals<IntervalSet>) {
        assert_eq!(grouped.names(), vec!["tx1", "tx2", "tx3"]);
        assert_eq!(grouped.get("tx3").unwrap().len(), 1);
        assert_eq!(grouped.get_index(0).unwrap().len(), 2);
        assert!(grouped.get("nope").is_none());
        assert_eq!(grouped.element_lengths(), vec![2, 0, 1]);
        assert_eq!(grouped.universe(), Some("hg38"));
    }

    #[rstest]
    fn test_duplicate_key(mut grouped: GroupedIntervals<IntervalSet>) {
        assert_eq!(
            grouped.insert("tx1", IntervalSet::empty()),
            Err(ValidationError::DuplicateKey("tx1".to_string()))
        );
    }

    #[rstest]
    fn test_unlist_with_provenance(grouped: GroupedIntervals<IntervalSet>) {
        let (flat, origin) = grouped.unlist_with_provenance();
        assert_eq!(flat.starts(), vec![1, 10, 3]);
        assert_eq!(origin, vec![0, 0, 2]);
    }

    #[rstest]
    fn test_unnamed_keys() {
        let g = GroupedIntervals::from_unnamed(vec![IntervalSet::empty(), IntervalSet::empty()]);
        assert_eq!(g.names(), vec!["1", "2"]);
        assert!(g.get("2").is_some());
    }

    #[rstest]
    fn test_map_groups_matches_parallel(grouped: GroupedIntervals<IntervalSet>) {
        let seq = grouped.map_groups(|g| g.total_width());
        let par = grouped.par_map_groups(|g| g.total_width());
        assert_eq!(seq, par);
        assert_eq!(seq.get("tx1"), Some(&8));
        assert_eq!(par.universe(), Some("hg38"));
    }

    #[rstest]
    fn test_unlist_annotated() {
        let a = AnnotatedIntervalSet::on_sequence("chr1", IntervalSet::from_pairs(&[(1, 2), (5, 9)]).unwrap())
            .with_column("score", MetaColumn::Int(vec![10, 20]))
            .unwrap();
        let b = AnnotatedIntervalSet::on_sequence("chr2", IntervalSet::from_pairs(&[(3, 3)]).unwrap())
            .with_column("score", MetaColumn::Int(vec![30]))
            .unwrap();
        let g = GroupedIntervals::from_pairs(vec![
            ("a".to_string(), a),
            ("empty".to_string(), AnnotatedIntervalSet::default()),
            ("b".to_string(), b),
        ])
        .unwrap();

        let flat = g.unlist(true).unwrap();
        assert_eq!(flat.len(), 3);
        assert_eq!(flat.metadata().names(), vec!["group", "score"]);
        let row = flat.row(2).unwrap();
        assert_eq!(row.seqname, "chr2");
        assert_eq!(row.meta("group"), Some(MetaValue::Str("b")));
        assert_eq!(row.meta("score"), Some(MetaValue::Int(30)));

        let plain = g.unlist(false).unwrap();
        assert_eq!(plain.metadata().names(), vec!["score"]);
    }

    #[rstest]
    fn test_unlist_annotated_schema_mismatch() {
        let a = AnnotatedIntervalSet::on_sequence("chr1", IntervalSet::from_pairs(&[(1, 2)]).unwrap())
            .with_column("score", MetaColumn::Int(vec![10]))
            .unwrap();
        let b = AnnotatedIntervalSet::on_sequence("chr1", IntervalSet::from_pairs(&[(4, 5)]).unwrap());
        let g = GroupedIntervals::from_pairs(vec![("a".to_string(), a), ("b".to_string(), b)]).unwrap();
        assert!(matches!(
            g.unlist(false),
            Err(ValidationError::SchemaMismatch { group, .. }) if group == "b"
        ));
    }
}
