use grangers_core::models::{AnnotatedIntervalSet, GroupedIntervals, IntervalSet};

use crate::genomic_ranges::GenomicRanges;
use crate::interval_ranges::IntervalRanges;

///
/// Group-wise normalization of a [GroupedIntervals] collection. Each group is
/// processed on its own; keys and order are kept and groups never mix.
///
pub trait GroupedRanges {
    fn reduce(&self) -> Self;
    fn disjoin(&self) -> Self;
}

impl GroupedRanges for GroupedIntervals<IntervalSet> {
    fn reduce(&self) -> Self {
        self.par_map_groups(|g| g.reduce())
    }

    fn disjoin(&self) -> Self {
        self.par_map_groups(|g| g.disjoin())
    }
}

/// Annotated groups are normalized strand-aware.
impl GroupedRanges for GroupedIntervals<AnnotatedIntervalSet> {
    fn reduce(&self) -> Self {
        self.par_map_groups(|g| GenomicRanges::reduce(g, false))
    }

    fn disjoin(&self) -> Self {
        self.par_map_groups(|g| GenomicRanges::disjoin(g, false))
    }
}
